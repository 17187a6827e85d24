use devca::authority::Authority;
use devca::cert::params::CertOptions;

fn main() -> devca::error::Result<()> {
    // Root authority valid for a day, with a freshly generated RSA key
    let ca = Authority::new(
        None,
        &CertOptions::builder()
            .common_name("My Test CA")
            .valid_for(time::Duration::hours(24))
            .build(),
    )?;

    println!("CA Certificate PEM:\n{}", ca.to_pem());

    // Server certificate signed by the CA
    let server = ca.new_cert(
        None,
        &CertOptions::builder()
            .common_name("myserver.local")
            .valid_for(time::Duration::hours(1))
            .build(),
    )?;

    println!("Server Certificate PEM:\n{}", server.to_pem());
    if let Some(key) = server.key() {
        println!("Server Key PEM:\n{}", key.to_pem()?);
    }

    Ok(())
}
