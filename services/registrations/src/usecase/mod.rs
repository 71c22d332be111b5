pub mod otp;
pub mod registration;
