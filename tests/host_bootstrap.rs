//! End-to-end bootstrap against the host subsystems, on a temporary data
//! directory.

use std::fs;

use notaryd::config::ServerConfig;
use notaryd::lifecycle::{BootstrapError, ServerLoader};
use tempfile::TempDir;

// RFC 8032 test vector 1 seed.
const SEED_HEX: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

fn config_with_data_dir(dir: &TempDir) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.signals.install = false;
    config.storage.data_dir = Some(dir.path().to_path_buf());
    config
}

fn write_contract(dir: &TempDir, body: &str) {
    let server_dir = dir.path().join("server");
    fs::create_dir_all(&server_dir).unwrap();
    fs::write(server_dir.join("notary.toml"), body).unwrap();
}

#[test]
fn bootstrap_resolves_the_port_from_the_contract() {
    let dir = TempDir::new().unwrap();
    write_contract(
        &dir,
        &format!(
            "notary_id = \"notary-test-1\"\nhost = \"notary.example\"\nport = 7085\nsigning_seed = \"{}\"\n",
            SEED_HEX
        ),
    );

    let loader = ServerLoader::bootstrap(&config_with_data_dir(&dir)).unwrap();
    assert_eq!(loader.listen_port().unwrap(), 7085);
    assert!(loader.flags().server);
    assert_eq!(loader.data_dir().unwrap(), dir.path().join("server"));

    let server = loader.server().unwrap();
    let contract = server.contract().unwrap();
    assert_eq!(contract.notary_id, "notary-test-1");
}

#[test]
fn bootstrap_without_a_contract_defers_the_endpoint_failure() {
    let dir = TempDir::new().unwrap();
    let loader = ServerLoader::bootstrap(&config_with_data_dir(&dir)).unwrap();

    assert!(loader.flags().server);
    assert!(matches!(
        loader.listen_port(),
        Err(BootstrapError::Endpoint(_))
    ));
}

#[test]
fn malformed_contract_defers_the_endpoint_failure() {
    let dir = TempDir::new().unwrap();
    write_contract(&dir, "this is not a contract");

    let loader = ServerLoader::bootstrap(&config_with_data_dir(&dir)).unwrap();
    assert!(matches!(
        loader.listen_port(),
        Err(BootstrapError::Endpoint(_))
    ));
}

#[test]
fn bootstrap_fails_when_the_data_path_is_a_file() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocked");
    fs::write(&blocker, b"not a directory").unwrap();

    let mut config = ServerConfig::default();
    config.signals.install = false;
    config.storage.data_dir = Some(blocker);

    let err = ServerLoader::bootstrap(&config)
        .err()
        .expect("bootstrap must fail");
    assert!(matches!(err, BootstrapError::DataDir(_)));
}
