use charlm_core::model::store;
use charlm_core::{GenerationInput, ModelConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Order 15 remembers long stretches of the corpus; sentinel '~'
    // marks line boundaries during training
    let config = ModelConfig::new(15, '~')?;

    // Train from the corpus, or load "./data/charles.o15.bin" if it was cached before
    let model = store::load_or_train("./data/charles.txt", &config)?;
    println!("done: {} histories", model.len());

    // Unseeded run, different on every call
    let input = GenerationInput::default();
    println!("{}", model.generate(input.n_letters, &mut input.rng())?);

    // Seeded run, identical on every call
    let seeded = GenerationInput { n_letters: 300, seed: Some(42) };
    let first = model.generate(seeded.n_letters, &mut seeded.rng())?;
    let second = model.generate(seeded.n_letters, &mut seeded.rng())?;
    println!("{first}");
    println!("reproducible: {}", first == second);

    // An order of 0 is rejected at construction
    match ModelConfig::new(0, '~') {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Order 0 is invalid: {e}"),
    }

    Ok(())
}
