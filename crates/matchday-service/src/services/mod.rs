pub mod account_service;
pub mod fixture_service;
pub mod team_service;
pub mod token_service;
pub mod validation;
