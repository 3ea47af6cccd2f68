use std::sync::atomic::AtomicBool;
use std::time::Instant;

use mazebot::{
    config::FactoryConfig,
    factory::{StubOrder, build_maze},
    generators::Generator,
    logging,
};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let _guard = logging::init("mazebot-profile.log")?;

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(20)
        .max(1);
    let skill = args.next().and_then(|s| s.parse::<u8>().ok()).unwrap_or(12);

    let config = FactoryConfig::default();
    let never_cancelled = AtomicBool::new(false);
    for generator in Generator::ALL {
        let started = Instant::now();
        for seed in 0..num_iters as u64 {
            let order = StubOrder::new(skill, generator, false, Some(seed));
            build_maze(&config, &order, &never_cancelled)?;
        }
        let elapsed = started.elapsed();
        tracing::info!("{} built {} mazes in {:?}", generator, num_iters, elapsed);
        println!(
            "{generator}: {num_iters} mazes at skill {skill} in {elapsed:?} ({:?} each)",
            elapsed / num_iters
        );
    }
    Ok(())
}
