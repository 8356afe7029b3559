use ferrite_trainer::{
    ActivationFunction, Adam, LogReceiver, LossType, MemorySource, NetworkBuilder, Optimizer,
    TrainConfig, Trainer,
};

fn main() -> ferrite_trainer::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut network = NetworkBuilder::new()
        .add_input_layer(2)?
        .add_layer(4, ActivationFunction::Tanh)?
        .add_layer(1, ActivationFunction::Sigmoid)?
        .build()?;
    network.initialize_random();

    let samples = vec![
        (vec![1.0, 0.0], vec![1.0]),
        (vec![1.0, 1.0], vec![0.0]),
        (vec![0.0, 1.0], vec![1.0]),
        (vec![0.0, 0.0], vec![0.0]),
    ];

    let config = TrainConfig {
        threads: 2,
        optimizer: Optimizer::Adam(Adam::new(0.05, 0.9, 0.999, 1e-8)),
        ..TrainConfig::new(500, 4, LossType::Mse)
    };

    let mut trainer = Trainer::new(network, config)?;
    let mut source = MemorySource::new(samples.clone());
    let summary = trainer.train(&mut source, None, &mut LogReceiver)?;

    if let Some(last) = summary.last() {
        println!("Final mean loss after {} epochs: {:.6}", last.epoch, last.mean_train_loss());
    }

    let mut network = trainer.into_network();
    for (input, _) in &samples {
        println!("Input: {:?} -> Output: {:.4}", input, network.forward(input)?[0]);
    }
    Ok(())
}
