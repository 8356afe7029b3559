use std::io::Write;

use ferrite_trainer::persist::{self, Encoding};
use ferrite_trainer::{
    ActivationFunction, CheckpointConfig, EpochStats, LineSource, LossType, MemorySource, NetError,
    Network, NetworkBuilder, NetworkSpec, Optimizer, OutputReceiver, Sgd, ShuffleSource, TrainConfig,
    Trainer,
};

#[derive(Default)]
struct Recorder {
    batches: Vec<f64>,
    validations: Vec<f64>,
    epochs: Vec<EpochStats>,
}

impl OutputReceiver for Recorder {
    fn on_training_loss(&mut self, loss: f64) {
        self.batches.push(loss);
    }

    fn on_validation_loss(&mut self, loss: f64) {
        self.validations.push(loss);
    }

    fn on_epoch_end(&mut self, stats: &EpochStats) {
        self.epochs.push(stats.clone());
    }
}

fn sgd(threads: usize, epochs: usize, batch_size: usize, lr: f64, loss: LossType) -> TrainConfig {
    TrainConfig {
        threads,
        optimizer: Optimizer::Sgd(Sgd::new(lr)),
        ..TrainConfig::new(epochs, batch_size, loss)
    }
}

#[test]
fn mae_identity_network_reaches_zero_loss() {
    let network = NetworkBuilder::new()
        .add_input_layer(2).unwrap()
        .add_layer(1, ActivationFunction::Identity).unwrap()
        .build().unwrap();
    let mut source = MemorySource::new(vec![
        (vec![1.0, 0.0], vec![1.0]),
        (vec![0.0, 1.0], vec![2.0]),
        (vec![1.0, 1.0], vec![3.0]),
        (vec![2.0, 1.0], vec![4.0]),
    ]);

    let mut trainer = Trainer::new(network, sgd(1, 50, 1, 0.25, LossType::Mae)).unwrap();
    let summary = trainer.train(&mut source, None, &mut Recorder::default()).unwrap();

    let first_zero = summary.history.iter().position(|s| s.train_loss == 0.0);
    assert!(first_zero.is_some_and(|epoch| epoch < 20), "{:?}", summary.history);
    assert_eq!(summary.last().unwrap().train_loss, 0.0);
    assert_eq!(trainer.network().parameters(), vec![1.0, 2.0, 0.0]);
}

fn regression_data() -> Vec<(Vec<f64>, Vec<f64>)> {
    (0..64)
        .map(|i| {
            let a = (i % 8) as f64 / 8.0 - 0.5;
            let b = (i / 8) as f64 / 8.0 - 0.5;
            (vec![a, b], vec![(a * 1.5 - b).tanh() * 0.5, a * b])
        })
        .collect()
}

fn fixed_network() -> Network {
    let mut network = Network::new(2, vec![
        (5, ActivationFunction::Tanh),
        (2, ActivationFunction::Identity),
    ]).unwrap();
    let count = network.parameter_count();
    let values: Vec<f64> = (0..count).map(|i| ((i * 7919 % 23) as f64 / 23.0 - 0.5) * 0.8).collect();
    network.set_parameters(&values).unwrap();
    network
}

#[test]
fn thread_count_does_not_change_the_result() {
    let mut finals = Vec::new();

    for threads in [1, 2, 4, 8, 16] {
        let mut trainer = Trainer::new(fixed_network(), sgd(threads, 15, 16, 0.1, LossType::Mse)).unwrap();
        let mut source = MemorySource::new(regression_data());
        let summary = trainer.train(&mut source, None, &mut Recorder::default()).unwrap();
        finals.push((threads, summary.last().unwrap().train_loss, trainer.into_network().parameters()));
    }

    let (_, reference_loss, reference_params) = &finals[0];
    for (threads, loss, params) in &finals[1..] {
        assert!((loss - reference_loss).abs() < 1e-9, "{threads} threads: {loss} vs {reference_loss}");
        for (a, b) in params.iter().zip(reference_params) {
            assert!((a - b).abs() < 1e-9, "{threads} threads drifted");
        }
    }
}

#[test]
fn training_reduces_loss() {
    let mut trainer = Trainer::new(fixed_network(), sgd(4, 40, 8, 0.1, LossType::Mse)).unwrap();
    let mut source = MemorySource::new(regression_data());
    let summary = trainer.train(&mut source, None, &mut Recorder::default()).unwrap();

    let first = summary.history.first().unwrap().train_loss;
    let last = summary.last().unwrap().train_loss;
    assert!(last < first * 0.5, "loss went from {first} to {last}");
}

#[test]
fn validation_pass_leaves_weights_untouched() {
    let network = fixed_network();
    let before = network.parameters();
    let mut trainer = Trainer::new(network, sgd(3, 4, 8, 0.1, LossType::Mse)).unwrap();

    let mut empty = MemorySource::default();
    let mut validation = MemorySource::new(regression_data());
    let mut recorder = Recorder::default();
    trainer.train(&mut empty, Some(&mut validation), &mut recorder).unwrap();

    assert_eq!(trainer.network().parameters(), before);
    assert!(recorder.batches.is_empty());
    assert_eq!(recorder.validations.len(), 4);
    assert!(recorder.validations[0] > 0.0);
    assert!(recorder.validations.iter().all(|v| (v - recorder.validations[0]).abs() < 1e-9));
    assert_eq!(recorder.epochs[3].val_samples, 64);
}

#[test]
fn misconfiguration_is_rejected_before_training() {
    let network = fixed_network();

    let no_loss = TrainConfig { loss: None, ..sgd(2, 1, 4, 0.1, LossType::Mse) };
    let no_batch = sgd(2, 1, 0, 0.1, LossType::Mse);
    let no_threads = sgd(0, 1, 4, 0.1, LossType::Mse);
    let bad_levels = TrainConfig { quantization: vec![256, 256, 256], ..sgd(2, 1, 4, 0.1, LossType::Mse) };

    for config in [no_loss, no_batch, no_threads, bad_levels] {
        let result = Trainer::new(network.clone(), config);
        assert!(matches!(result, Err(NetError::Configuration(_))));
    }
}

#[test]
fn checkpoints_are_written_and_loadable() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrainConfig {
        checkpoint: Some(CheckpointConfig::new(dir.path(), 2)),
        quantization: vec![255, 127],
        ..sgd(2, 4, 16, 0.1, LossType::Mse)
    };
    let mut trainer = Trainer::new(fixed_network(), config).unwrap();
    let mut source = MemorySource::new(regression_data());
    let summary = trainer.train(&mut source, None, &mut Recorder::default()).unwrap();

    let names: Vec<String> = summary.checkpoints.iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["nn_2.bin", "quantized_nn_2.bin", "nn_4.bin", "quantized_nn_4.bin"]);

    let trained = trainer.into_network();
    let count = trained.parameter_count() as u64;
    assert_eq!(std::fs::metadata(dir.path().join("nn_4.bin")).unwrap().len(), 8 * count);
    assert_eq!(std::fs::metadata(dir.path().join("quantized_nn_4.bin")).unwrap().len(), 4 * count);

    let mut restored = fixed_network();
    persist::load(&mut restored, &Encoding::Raw, dir.path().join("nn_4.bin")).unwrap();
    assert_eq!(restored.parameters(), trained.parameters());
}

#[test]
fn trains_from_shuffled_csv_lines() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for (input, expected) in regression_data() {
        writeln!(file, "{},{},{},{}", input[0], input[1], expected[0], expected[1]).unwrap();
    }

    let parse = |line: &str, input: &mut [f64], expected: &mut [f64]| {
        let values: Vec<f64> = line.split(',').map(|v| v.parse().unwrap()).collect();
        input.copy_from_slice(&values[..2]);
        expected.copy_from_slice(&values[2..]);
    };
    let lines = LineSource::open(file.path(), 2, 2, parse).unwrap();
    let mut source = ShuffleSource::with_capacity(lines, 16);

    let mut trainer = Trainer::new(fixed_network(), sgd(4, 30, 8, 0.1, LossType::Mse)).unwrap();
    let summary = trainer.train(&mut source, None, &mut Recorder::default()).unwrap();

    assert!(summary.history.iter().all(|s| s.train_samples == 64));
    let first = summary.history.first().unwrap().train_loss;
    assert!(summary.last().unwrap().train_loss < first);
}

#[test]
fn network_spec_drives_a_run() {
    let spec: NetworkSpec = serde_json::from_str(r#"{
        "name": "tiny",
        "input_size": 2,
        "layers": [
            { "size": 3, "activation": { "type": "LeakyReLU", "alpha": 0.01 } },
            { "size": 2, "activation": { "type": "Identity" } }
        ],
        "loss": "huber"
    }"#).unwrap();

    let mut network = spec.to_network().unwrap();
    network.initialize_random();
    let config = TrainConfig {
        optimizer: serde_json::from_str(r#"{ "type": "AdamW", "alpha": 0.01 }"#).unwrap(),
        ..TrainConfig::new(3, 8, spec.loss)
    };

    let mut trainer = Trainer::new(network, config).unwrap();
    let mut source = MemorySource::new(regression_data());
    let summary = trainer.train(&mut source, None, &mut Recorder::default()).unwrap();
    assert_eq!(summary.epochs_completed(), 3);
    assert!(summary.history.iter().all(|s| s.train_loss.is_finite()));
}

#[test]
fn short_label_fails_instead_of_hanging() {
    let network = NetworkBuilder::new()
        .add_input_layer(2).unwrap()
        .add_layer(2, ActivationFunction::Identity).unwrap()
        .build().unwrap();
    let mut trainer = Trainer::new(network, sgd(2, 1, 4, 0.1, LossType::Mse)).unwrap();
    let mut source = MemorySource::new(vec![(vec![1.0, 1.0], vec![1.0])]);

    let (sender, receiver) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let result = trainer.train(&mut source, None, &mut Recorder::default());
        let _ = sender.send(result.map(|summary| summary.epochs_completed()));
    });

    let result = receiver.recv_timeout(std::time::Duration::from_secs(10))
        .expect("training did not return");
    assert!(matches!(result, Err(NetError::ShapeMismatch { expected: 2, found: 1 })), "{result:?}");
}

#[test]
fn short_label_in_validation_is_rejected() {
    let mut trainer = Trainer::new(fixed_network(), sgd(3, 2, 8, 0.1, LossType::Mse)).unwrap();
    let mut source = MemorySource::new(regression_data());
    let mut validation = MemorySource::new(vec![(vec![0.5, 0.5], vec![0.0])]);

    let result = trainer.train(&mut source, Some(&mut validation), &mut Recorder::default());
    assert!(matches!(result, Err(NetError::ShapeMismatch { expected: 2, found: 1 })));
}
