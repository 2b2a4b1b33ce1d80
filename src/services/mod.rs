pub mod accounts;
pub mod follows;
pub mod mailer;
pub mod profile;
pub mod similarity;
pub mod tmdb;
pub mod tracks;
pub mod verification;
