// Saving and loading networks as JSON.

mod common;

use rand::rngs::StdRng;
use rand::SeedableRng;
use sigmoid_mlp::{Network, NetworkError};

#[test]
fn cleared_network_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nn.json");

    let mut net = Network::create(&[6, 4, 3], &mut StdRng::seed_from_u64(8)).unwrap();
    let input = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
    let before = net.feed_forward(&input).unwrap().to_vec();

    net.clear_activations();
    net.save_json(&path).unwrap();
    let mut loaded = Network::load_json(&path).unwrap();

    for (original, reloaded) in net.layers().iter().zip(loaded.layers()) {
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(original.biases.as_slice()), bits(reloaded.biases.as_slice()));
        for (a, b) in original.weights.data.iter().zip(&reloaded.weights.data) {
            assert_eq!(bits(a.as_slice()), bits(b.as_slice()));
        }
        assert!(reloaded.neurons.iter().all(|&n| n == 0.0));
    }

    let after = loaded.feed_forward(&input).unwrap().to_vec();
    assert_eq!(before, after);
}

#[test]
fn momentum_is_not_persisted() {
    let mut net = common::fixed_network();
    net.feed_forward(&[1.0, 1.0, 0.0, 0.0]).unwrap();
    net.back_propagate(&[0.0, 1.0], 0.5, 0.9).unwrap();
    assert!(!net.momentum().is_zero());

    let json = net.to_json_string().unwrap();
    assert!(!json.contains("momentum"));
    let loaded = Network::from_json_str(&json).unwrap();
    assert!(loaded.momentum().is_zero());
    assert_eq!(loaded.momentum().delta_weights[0].shape(), (4, 3));
}

#[test]
fn loaded_network_must_be_fed_before_training() {
    let json = common::fixed_network().to_json_string().unwrap();
    let mut loaded = Network::from_json_str(&json).unwrap();
    assert!(matches!(
        loaded.back_propagate(&[1.0, 0.0], 0.1, 0.0),
        Err(NetworkError::StalePassState)
    ));
}

#[test]
fn record_with_mismatched_shapes_is_invalid_configuration() {
    let json = r#"{"layers":[
        {"neurons":[0,0],"biases":[0,0],"weights":{"rows":2,"cols":3,"data":[[1,2,3],[4,5,6]]}},
        {"neurons":[0,0],"biases":[0,0],"weights":{"rows":2,"cols":0,"data":[[],[]]}}
    ]}"#;
    assert!(matches!(
        Network::from_json_str(json),
        Err(NetworkError::InvalidConfiguration(_))
    ));
}

#[test]
fn record_with_single_layer_is_invalid_configuration() {
    let json = r#"{"layers":[{"neurons":[0],"biases":[0],"weights":{"rows":1,"cols":0,"data":[[]]}}]}"#;
    assert!(matches!(
        Network::from_json_str(json),
        Err(NetworkError::InvalidConfiguration(_))
    ));
}

#[test]
fn malformed_json_is_a_json_error() {
    assert!(matches!(Network::from_json_str("{\"layers\": 3}"), Err(NetworkError::Json(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Network::load_json(dir.path().join("absent.json")),
        Err(NetworkError::Io(_))
    ));
}

#[test]
fn diverged_network_is_not_saved_over_a_good_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nn.json");

    let mut net = common::fixed_network();
    net.save_json(&path).unwrap();

    net.feed_forward(&[1.0, 0.0, 0.0, 1.0]).unwrap();
    net.back_propagate(&[1.0, 0.0], f64::INFINITY, 0.0).unwrap();
    net.clear_activations();

    assert!(matches!(net.save_json(&path), Err(NetworkError::InvalidConfiguration(_))));
    assert!(matches!(net.to_json_string(), Err(NetworkError::InvalidConfiguration(_))));

    let reloaded = Network::load_json(&path).unwrap();
    assert_eq!(reloaded.layers(), common::fixed_network().layers());
}

#[test]
fn saving_replaces_existing_file_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nn.json");
    std::fs::write(&path, "stale").unwrap();

    let net = common::fixed_network();
    net.save_json(&path).unwrap();

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("nn.json")]);
    assert_eq!(Network::load_json(&path).unwrap().layers(), net.layers());
}

#[test]
fn failed_save_leaves_no_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nn.json");

    assert!(matches!(common::fixed_network().save_json(&path), Err(NetworkError::Io(_))));
    assert!(!dir.path().join("missing").exists());
}
