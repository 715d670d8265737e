//! Local install hosting against a simulated packaging script

use async_trait::async_trait;
use corekit_core::{CommandOutcome, CommandRunner, CommandSpec, Error, Result};
use corekit_package::{
    serve_listener, HostOptions, LocalInstallHost, PACKAGE_INDEX_NAME, RELEASE_URL,
};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Writes the zip one level above the working directory, as the script does
struct PackagingScript {
    produce_zip: bool,
}

#[async_trait]
impl CommandRunner for PackagingScript {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        assert_eq!(spec.program, "sh");
        assert_eq!(spec.args, vec!["package_core.sh"]);
        if self.produce_zip {
            let cwd = spec.cwd.clone().unwrap();
            fs::write(cwd.join("../silabs_arduino_core-1.0.0.zip"), "abc").unwrap();
        }
        Ok(CommandOutcome {
            exit_code: Some(0),
            ..Default::default()
        })
    }
}

fn package_dir(temp: &TempDir) -> PathBuf {
    let dir = temp.path().join("package");
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(PACKAGE_INDEX_NAME),
        format!(
            r#"{{"packages":[{{"platforms":[{{"url":"{RELEASE_URL}/silabs_arduino_core-1.0.0.zip","size":"0","checksum":""}}]}}]}}"#
        ),
    )
    .unwrap();
    dir
}

#[tokio::test]
async fn test_prepare_host_directory() {
    let temp = TempDir::new().unwrap();
    let options = HostOptions {
        package_dir: package_dir(&temp),
        port: 8080,
        ..Default::default()
    };
    fs::create_dir_all(options.host_path()).unwrap();
    fs::write(options.host_path().join(options.zip_name()), "stale").unwrap();

    let host = LocalInstallHost::new(Arc::new(PackagingScript { produce_zip: true }), options);
    let hosted = host
        .prepare(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5)))
        .await
        .unwrap();

    assert_eq!(hosted.core.size, 3);
    assert_eq!(
        hosted.core.sha256,
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        hosted.index_url,
        format!("http://10.0.0.5:8080/{PACKAGE_INDEX_NAME}")
    );
    assert!(!temp.path().join("silabs_arduino_core-1.0.0.zip").exists());
    assert_eq!(
        fs::read_to_string(hosted.host_dir.join("silabs_arduino_core-1.0.0.zip")).unwrap(),
        "abc"
    );

    let index: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&hosted.index_path).unwrap()).unwrap();
    let platform = &index["packages"][0]["platforms"][0];
    assert_eq!(platform["size"], 3);
    assert_eq!(
        platform["checksum"],
        "SHA-256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(
        platform["url"],
        "http://10.0.0.5:8080/silabs_arduino_core-1.0.0.zip"
    );
}

#[tokio::test]
async fn test_missing_zip_fails() {
    let temp = TempDir::new().unwrap();
    let options = HostOptions {
        package_dir: package_dir(&temp),
        ..Default::default()
    };

    let host = LocalInstallHost::new(Arc::new(PackagingScript { produce_zip: false }), options);
    let err = host
        .prepare(IpAddr::V4(Ipv4Addr::LOCALHOST))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::FileOperation { action: "move", .. }));
}

#[tokio::test]
async fn test_serves_host_directory() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(PACKAGE_INDEX_NAME), "{}").unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let dir = temp.path().to_path_buf();
    let server = tokio::spawn(async move {
        serve_listener(listener, &dir, async {
            let _ = stop_rx.await;
        })
        .await
    });

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET /{PACKAGE_INDEX_NAME} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with("{}"));

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
