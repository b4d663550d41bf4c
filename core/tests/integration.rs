//! End-to-end pipeline tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port and drives the full
//! pipeline through `process_call` with an explicit configuration, so
//! tests never touch the process-wide config singleton and can run in
//! parallel.

use std::net::SocketAddr;

use callbridge_core::buffer::{decode_fields, encode_fields, OUTPUT_LEN};
use callbridge_core::{last_error_message, process_call, RequestConfig};

/// Start the mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr) -> RequestConfig {
    RequestConfig {
        base_url: format!("http://{addr}/api/index.php"),
        ..RequestConfig::default()
    }
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn successful_call_with_response_requested() {
    let config = config_for(start_server());
    let input = encode_fields(&owned(&[
        ("Endpoint", "procesareDate_1"),
        ("CFResp", "yes"),
        ("Tel", "0744516456"),
        ("CIF", "1234KTE"),
        ("CID", "193691036401673"),
    ]))
    .unwrap();

    let mut out = [0u8; OUTPUT_LEN];
    let status = process_call(Some(&input), Some(&mut out), &config);
    assert_eq!(status, 0);
    assert_eq!(last_error_message(), "OK");

    let decoded = decode_fields(&out).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded["CFResp"], "Success!");
}

#[test]
fn successful_call_without_response_leaves_output_untouched() {
    let config = config_for(start_server());
    let input = encode_fields(&owned(&[
        ("Endpoint", "procesareDate_1"),
        ("Tel", "0744516456"),
        ("CIF", "1234KTE"),
        ("CID", "193691036401673"),
    ]))
    .unwrap();

    let mut out = [0xAAu8; OUTPUT_LEN];
    let status = process_call(Some(&input), Some(&mut out), &config);
    assert_eq!(status, 0);
    assert!(out.iter().all(|&b| b == 0xAA), "output buffer must stay as supplied");
}

#[test]
fn http_404_maps_to_status_5() {
    let config = config_for(start_server());
    let input = encode_fields(&owned(&[("Endpoint", "noSuchThing"), ("CFResp", "yes")])).unwrap();

    let mut out = [0u8; OUTPUT_LEN];
    let status = process_call(Some(&input), Some(&mut out), &config);
    assert_eq!(status, 5);
    assert!(last_error_message().contains("404"), "{}", last_error_message());
    assert!(out.iter().all(|&b| b == 0), "failed call must not write output");
}

#[test]
fn http_400_maps_to_status_5() {
    let config = config_for(start_server());
    // procesareDate_1 without its required parameters.
    let input = encode_fields(&owned(&[("Endpoint", "procesareDate_1")])).unwrap();

    let status = process_call(Some(&input), None, &config);
    assert_eq!(status, 5);
    assert!(last_error_message().contains("400"));
}

#[test]
fn null_input_fails_without_a_network_attempt() {
    // No server at all: a dispatch attempt would surface as status 4.
    let config = RequestConfig {
        base_url: "http://127.0.0.1:1/api/index.php".to_string(),
        ..RequestConfig::default()
    };
    let status = process_call(None, None, &config);
    assert_eq!(status, 1);
    assert!(last_error_message().contains("null"));
}

#[test]
fn undersized_buffer_fails_without_a_network_attempt() {
    let config = RequestConfig {
        base_url: "http://127.0.0.1:1/api/index.php".to_string(),
        ..RequestConfig::default()
    };
    // Declares 15 fields, provides none.
    let status = process_call(Some(b"15"), None, &config);
    assert_eq!(status, 1);
    assert!(last_error_message().contains("15 fields"));
}

#[test]
fn refused_connection_maps_to_status_4() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = config_for(addr);
    let input = encode_fields(&owned(&[("Endpoint", "getInfo"), ("Id", "1")])).unwrap();
    let status = process_call(Some(&input), None, &config);
    assert_eq!(status, 4);
    assert!(last_error_message().starts_with("transport error"));
}

#[test]
fn concurrent_calls_keep_results_and_messages_per_thread() {
    let config = config_for(start_server());

    let mut handles = Vec::new();
    for i in 0..8 {
        let config = config.clone();
        handles.push(std::thread::spawn(move || {
            let input = encode_fields(&owned(&[
                ("Endpoint", "getInfo"),
                ("Id", &i.to_string()),
                ("CFResp", "yes"),
            ]))
            .unwrap();

            let mut out = [0u8; OUTPUT_LEN];
            let status = process_call(Some(&input), Some(&mut out), &config);
            assert_eq!(status, 0);
            assert_eq!(last_error_message(), "OK");

            let decoded = decode_fields(&out).unwrap();
            assert_eq!(decoded["CFResp"], format!("Info for ID={i}: customer record found"));
        }));
    }

    // Failing calls interleave with the successful ones; each thread must
    // see only its own message.
    for _ in 0..4 {
        let config = config.clone();
        handles.push(std::thread::spawn(move || {
            let input =
                encode_fields(&owned(&[("Endpoint", "noSuchThing")])).unwrap();
            let status = process_call(Some(&input), None, &config);
            assert_eq!(status, 5);
            assert!(last_error_message().contains("404"));
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
