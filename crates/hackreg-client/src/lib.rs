//! Client side of hackathon registration.
//!
//! [`admission::AdmissionSession`] drives a participant from form entry
//! through email verification to a confirmed registration;
//! [`review::AdminReview`] covers shortlisting, certificates and export.
//! Both talk to the registrations service through [`api::RegistrationApi`].

pub mod admission;
pub mod api;
pub mod review;
