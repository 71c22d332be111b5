pub mod db;
pub mod mail;
pub mod otp_store;
