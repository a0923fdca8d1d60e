use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rustls::RootCertStore;
use rustls::pki_types::CertificateDer;
use rustls::pki_types::pem::PemObject;
use zeroize::Zeroizing;

use crate::error::ChannelError;

/// Password protecting a trust store, wiped from memory on drop.
///
/// PEM bundles are plain text, so the password is carried alongside the path
/// and never needed to read them.
#[derive(Clone)]
pub struct StorePassword(Zeroizing<String>);

impl StorePassword {
    /// Wraps `password`.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }

    /// Returns the password text.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StorePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StorePassword(..)")
    }
}

/// How the peer certificate is judged during the TLS handshake.
#[derive(Clone, Debug)]
pub enum TrustPolicy {
    /// **Insecure.** Accept any certificate chain for any host name.
    ///
    /// Only handshake signatures are still checked. Construct it through
    /// [`TrustPolicy::accept_all_insecure`] so the choice is visible at the
    /// call site.
    AcceptAll,
    /// Validate the chain and host name against the certificates in a PEM
    /// bundle.
    ValidateAgainstStore {
        /// PEM file holding one or more trust anchors.
        path: PathBuf,
        /// Password associated with the store, if any.
        password: Option<StorePassword>,
    },
}

impl TrustPolicy {
    /// Disables certificate validation entirely.
    #[must_use]
    pub const fn accept_all_insecure() -> Self {
        Self::AcceptAll
    }

    /// Validates the peer against the PEM bundle at `path`.
    #[must_use]
    pub fn validate_against_store(
        path: impl Into<PathBuf>,
        password: Option<StorePassword>,
    ) -> Self {
        Self::ValidateAgainstStore {
            path: path.into(),
            password,
        }
    }

    /// Reports whether certificate validation is switched off.
    #[must_use]
    pub const fn is_insecure(&self) -> bool {
        matches!(self, Self::AcceptAll)
    }
}

/// Reads every certificate in the PEM bundle at `path` into a root store.
pub fn load_trust_store(path: &Path) -> Result<RootCertStore, ChannelError> {
    let pem = fs::read(path).map_err(|source| ChannelError::TrustStoreRead {
        path: path.to_path_buf(),
        source,
    })?;

    let certificates = CertificateDer::pem_slice_iter(&pem)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| ChannelError::TrustStoreInvalid {
            path: path.to_path_buf(),
            detail: format!("failed to parse certificates: {error}"),
        })?;

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certificates);
    tracing::debug!(
        target: "burstlink::tls",
        "loaded {added} trust anchors from {} ({ignored} ignored)",
        path.display()
    );

    if roots.is_empty() {
        return Err(ChannelError::TrustStoreInvalid {
            path: path.to_path_buf(),
            detail: "no usable certificates".to_owned(),
        });
    }
    Ok(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn accept_all_is_flagged_insecure() {
        assert!(TrustPolicy::accept_all_insecure().is_insecure());
        assert!(!TrustPolicy::validate_against_store("store.pem", None).is_insecure());
    }

    #[test]
    fn password_is_not_printed() {
        let policy =
            TrustPolicy::validate_against_store("store.pem", Some(StorePassword::new("hunter2")));
        let rendered = format!("{policy:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("store.pem"));
    }

    #[test]
    fn empty_store_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "not a certificate").expect("write store");

        let error = load_trust_store(file.path()).expect_err("store has no certificates");
        assert!(matches!(error, ChannelError::TrustStoreInvalid { .. }));
    }

    #[test]
    fn generated_certificate_loads() {
        let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_owned()])
            .expect("certificate generation");
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(certified.cert.pem().as_bytes())
            .expect("write store");

        let roots = load_trust_store(file.path()).expect("store loads");
        assert_eq!(roots.len(), 1);
    }
}
