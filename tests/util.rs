#![allow(dead_code)]

use std::sync::OnceLock;

use devca::authority::Authority;
use devca::cert::params::CertOptions;
use devca::key::PrivateKey;

/// A root key shared across tests; RSA generation is slow.
pub fn root_key() -> PrivateKey {
    static KEY: OnceLock<PrivateKey> = OnceLock::new();
    KEY.get_or_init(|| PrivateKey::generate().unwrap()).clone()
}

pub fn leaf_key() -> PrivateKey {
    static KEY: OnceLock<PrivateKey> = OnceLock::new();
    KEY.get_or_init(|| PrivateKey::generate().unwrap()).clone()
}

pub fn options(common_name: &str, valid_for: time::Duration) -> CertOptions {
    CertOptions::builder()
        .common_name(common_name)
        .valid_for(valid_for)
        .build()
}

pub fn generate_ca() -> Authority {
    Authority::new(
        Some(root_key()),
        &options("myca.local", time::Duration::hours(24)),
    )
    .unwrap()
}
