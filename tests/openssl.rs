mod util;

use std::process::Command;

use devca::cert::params::CertOptions;
use devca::key::PrivateKey;
use openssl::nid::Nid;
use openssl::stack::Stack;
use openssl::x509::store::X509StoreBuilder;
use openssl::x509::{X509, X509StoreContext};
use time::Duration;

fn common_name(name: &openssl::x509::X509NameRef) -> String {
    name.entries_by_nid(Nid::COMMONNAME)
        .next()
        .unwrap()
        .data()
        .as_utf8()
        .unwrap()
        .to_string()
}

#[test]
fn test_openssl_crate_parses_authority_and_leaf() {
    let ca = util::generate_ca();
    let leaf = ca
        .new_cert(
            Some(util::leaf_key()),
            &util::options("server.myca.local", Duration::hours(1)),
        )
        .unwrap();

    let ca_x509 = X509::from_pem(ca.to_pem().as_bytes()).expect("Failed to parse CA PEM");
    let leaf_x509 = X509::from_der(leaf.to_der()).expect("Failed to parse leaf DER");

    assert_eq!(common_name(ca_x509.subject_name()), "myca.local");
    assert_eq!(common_name(ca_x509.issuer_name()), "myca.local");
    assert_eq!(common_name(leaf_x509.subject_name()), "server.myca.local");
    assert_eq!(common_name(leaf_x509.issuer_name()), "myca.local");

    assert_eq!(leaf_x509.version(), 2, "X509 version should be 3 (0-based index)");
    assert_eq!(
        leaf_x509.signature_algorithm().object().nid(),
        Nid::SHA256WITHRSAENCRYPTION
    );

    let serial = leaf_x509.serial_number().to_bn().unwrap().to_hex_str().unwrap();
    assert_eq!(
        u128::from_str_radix(&serial, 16).unwrap(),
        leaf.serial_number().unwrap().value()
    );

    let ca_public = ca_x509.public_key().unwrap();
    assert!(ca_x509.verify(&ca_public).unwrap(), "CA is not self-signed");
    assert!(leaf_x509.verify(&ca_public).unwrap(), "leaf not signed by CA");
}

#[test]
fn test_openssl_verifies_chain() {
    let ca = util::generate_ca();
    let leaf = ca
        .new_cert(Some(util::leaf_key()), &CertOptions::default())
        .unwrap();

    let ca_x509 = X509::from_der(ca.to_der()).unwrap();
    let leaf_x509 = X509::from_pem(leaf.to_pem().as_bytes()).unwrap();

    let mut builder = X509StoreBuilder::new().unwrap();
    builder.add_cert(ca_x509).unwrap();
    let store = builder.build();

    let chain = Stack::new().unwrap();
    let mut context = X509StoreContext::new().unwrap();
    let verified = context
        .init(&store, &leaf_x509, &chain, |c| {
            let ok = c.verify_cert()?;
            assert!(ok, "chain verification failed: {}", c.error());
            Ok(ok)
        })
        .unwrap();
    assert!(verified);
}

#[test]
fn test_openssl_reads_keys() {
    let key = util::root_key();

    let rsa = openssl::rsa::Rsa::private_key_from_pem(key.to_pem().unwrap().as_bytes())
        .expect("OpenSSL rejected the PKCS#1 PEM key");
    assert!(rsa.check_key().unwrap());
    assert_eq!(rsa.size() as usize * 8, devca::key::RSA_KEY_BITS);

    let rsa = openssl::rsa::Rsa::private_key_from_der(&key.to_der().unwrap()).unwrap();
    let openssl_public = rsa.public_key_to_der().unwrap();
    assert_eq!(openssl_public, key.public_key().to_der().unwrap());

    // Keys written by OpenSSL load back.
    let from_openssl = PrivateKey::from_der(&rsa.private_key_to_der().unwrap()).unwrap();
    assert_eq!(from_openssl, key);
}

#[test]
fn test_openssl_cli_text_output() {
    let ca = util::generate_ca();
    let leaf = ca
        .new_cert(
            Some(util::leaf_key()),
            &util::options("server.myca.local", Duration::hours(1)),
        )
        .unwrap();

    let cert_path = std::env::temp_dir().join(format!("devca_leaf_{}.pem", std::process::id()));
    std::fs::write(&cert_path, leaf.to_pem()).expect("Failed to write server certificate");

    let output = match Command::new("openssl")
        .arg("x509")
        .arg("-in")
        .arg(&cert_path)
        .arg("-noout")
        .arg("-text")
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            eprintln!("skipping, openssl CLI unavailable: {err}");
            let _ = std::fs::remove_file(&cert_path);
            return;
        }
    };
    std::fs::remove_file(&cert_path).expect("Failed to remove test certificate");

    assert!(
        output.status.success(),
        "OpenSSL command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("CN=myca.local") || text.contains("CN = myca.local"));
    assert!(text.contains("server.myca.local"));
    assert!(text.contains("Version: 3 (0x2)"));
    assert!(text.contains("sha256WithRSAEncryption"));
    assert!(text.contains("TLS Web Server Authentication"));
    assert!(text.contains("CA:FALSE"));
}
