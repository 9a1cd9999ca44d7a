//! Helpers to generate throwaway keystores for tests.

use std::path::PathBuf;

use openssl::asn1::{Asn1Integer, Asn1Time};
use openssl::bn::{BigNum, MsbOption};
use openssl::hash::MessageDigest;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::stack::Stack;
use openssl::x509::extension::{BasicConstraints, KeyUsage};
use openssl::x509::{X509, X509Builder, X509Name, X509NameBuilder};

/// Builds a self-signed certificate for `common_name` and wraps it,
/// together with one certificate per partner name in the CA chain, into
/// a passphrase-protected PKCS#12 keystore (DER).
pub fn generate_test_keystore(
    common_name: &str,
    partner_names: &[&str],
    passphrase: &str,
) -> Vec<u8> {
    let (cert, key) = generate_self_signed_certificate(common_name);

    let mut chain = Stack::new().unwrap();
    for name in partner_names {
        let (partner_cert, _) = generate_self_signed_certificate(name);
        chain.push(partner_cert).unwrap();
    }

    let mut builder = Pkcs12::builder();
    builder.name(common_name).pkey(&key).cert(&cert).ca(chain);
    builder.build2(passphrase).unwrap().to_der().unwrap()
}

/// Writes a generated keystore to a unique file under the system temp
/// directory and returns its path. Callers remove the file themselves.
pub fn write_test_keystore(
    common_name: &str,
    partner_names: &[&str],
    passphrase: &str,
) -> PathBuf {
    let path = std::env::temp_dir().join(format!("as2-keystore-{}.p12", uuid::Uuid::new_v4()));
    let der = generate_test_keystore(common_name, partner_names, passphrase);
    std::fs::write(&path, der).unwrap();
    path
}

pub fn generate_self_signed_certificate(common_name: &str) -> (X509, PKey<Private>) {
    let rsa = Rsa::generate(2048).unwrap();
    let key_pair = PKey::from_rsa(rsa).unwrap();

    let mut cert_builder = X509Builder::new().unwrap();

    cert_builder.set_version(2).unwrap();

    let serial_number = generate_serial_number();
    cert_builder.set_serial_number(&serial_number).unwrap();

    let subject_name = create_x509_name(&[
        ("O", "AS2 Test"),
        ("OU", "Trading Partners"),
        ("CN", common_name),
    ])
    .unwrap();
    cert_builder.set_subject_name(&subject_name).unwrap();
    cert_builder.set_issuer_name(&subject_name).unwrap();

    cert_builder.set_pubkey(&key_pair).unwrap();

    // Valid for 1 year
    let not_before = Asn1Time::days_from_now(0).unwrap();
    let not_after = Asn1Time::days_from_now(365).unwrap();
    cert_builder.set_not_before(&not_before).unwrap();
    cert_builder.set_not_after(&not_after).unwrap();

    cert_builder
        .append_extension(BasicConstraints::new().build().unwrap())
        .unwrap();

    cert_builder
        .append_extension(
            KeyUsage::new()
                .critical()
                .digital_signature()
                .key_encipherment()
                .build()
                .unwrap(),
        )
        .unwrap();

    cert_builder
        .sign(&key_pair, MessageDigest::sha256())
        .unwrap();

    (cert_builder.build(), key_pair)
}

fn generate_serial_number() -> Asn1Integer {
    let mut serial = BigNum::new().unwrap();
    serial.rand(128, MsbOption::MAYBE_ZERO, false).unwrap();
    serial.to_asn1_integer().unwrap()
}

fn create_x509_name(entries: &[(&str, &str)]) -> Result<X509Name, openssl::error::ErrorStack> {
    let mut name_builder = X509NameBuilder::new()?;
    for (key, value) in entries {
        name_builder.append_entry_by_text(key, value)?;
    }
    Ok(name_builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_keystore_parses_with_its_passphrase() {
        let der = generate_test_keystore("ME", &["THEM"], "secret");

        let keystore = Pkcs12::from_der(&der).unwrap();
        let parsed = keystore.parse2("secret").unwrap();
        assert!(parsed.pkey.is_some());
        assert!(parsed.cert.is_some());
        assert_eq!(parsed.ca.map(|ca| ca.len()), Some(1));
    }
}
