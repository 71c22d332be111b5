use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};

use crate::domain::repository::OtpStore;
use crate::domain::types::{ABANDONED_OTP_SECS, OtpEntry, VERIFIED_EMAIL_TTL_SECS};
use crate::error::RegistrationServiceError;

#[derive(Default)]
struct Inner {
    codes: HashMap<String, OtpEntry>,
    verified: HashMap<String, DateTime<Utc>>,
}

/// Process-local OTP store. Cloning shares the same maps.
///
/// Fine for a single service instance; several instances behind a load
/// balancer would need a shared store implementing [`OtpStore`].
#[derive(Clone, Default)]
pub struct MemoryOtpStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, RegistrationServiceError> {
        self.inner
            .lock()
            .map_err(|_| RegistrationServiceError::Internal(anyhow!("otp store lock poisoned")))
    }

    /// Drop expired verification marks.
    fn prune_verified(inner: &mut Inner, now: DateTime<Utc>) {
        let ttl = Duration::seconds(VERIFIED_EMAIL_TTL_SECS);
        inner.verified.retain(|_, at| now - *at <= ttl);
    }

    /// Drop codes nobody verified for a day.
    fn prune_abandoned(inner: &mut Inner, now: DateTime<Utc>) {
        let cutoff = Duration::seconds(ABANDONED_OTP_SECS);
        inner.codes.retain(|_, entry| now - entry.issued_at <= cutoff);
    }

    #[cfg(test)]
    fn code_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.codes.len()).unwrap_or(0)
    }
}

impl OtpStore for MemoryOtpStore {
    async fn put(&self, email: &str, entry: OtpEntry) -> Result<(), RegistrationServiceError> {
        let mut inner = self.lock()?;
        Self::prune_abandoned(&mut inner, Utc::now());
        inner.codes.insert(email.to_owned(), entry);
        Ok(())
    }

    async fn get(&self, email: &str) -> Result<Option<OtpEntry>, RegistrationServiceError> {
        Ok(self.lock()?.codes.get(email).cloned())
    }

    async fn remove(
        &self,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, RegistrationServiceError> {
        let mut inner = self.lock()?;
        match inner.codes.get(email) {
            Some(entry) if entry.issued_at == issued_at => {
                inner.codes.remove(email);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_verified(
        &self,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RegistrationServiceError> {
        let mut inner = self.lock()?;
        Self::prune_verified(&mut inner, Utc::now());
        inner.verified.insert(email.to_owned(), at);
        Ok(())
    }

    async fn is_verified(&self, email: &str) -> Result<bool, RegistrationServiceError> {
        let mut inner = self.lock()?;
        Self::prune_verified(&mut inner, Utc::now());
        Ok(inner.verified.contains_key(email))
    }

    async fn clear_verified(&self, email: &str) -> Result<(), RegistrationServiceError> {
        self.lock()?.verified.remove(email);
        Ok(())
    }
}
