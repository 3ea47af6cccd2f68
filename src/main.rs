use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use mazebot::{
    config::{DriverConfig, FactoryConfig, RobotConfig},
    drivers::{RobotDriver, WallFollower, Wizard},
    factory::{MazeFactory, StubOrder},
    generators::Generator,
    logging, render,
    robot::{BasicRobot, Robot},
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriverKind {
    Wizard,
    WallFollower,
}

impl FromStr for DriverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wizard" => Ok(DriverKind::Wizard),
            "wallfollower" | "wall-follower" => Ok(DriverKind::WallFollower),
            _ => Err(format!("unknown driver '{s}', expected wizard or wallfollower")),
        }
    }
}

#[derive(Debug)]
struct Settings {
    skill: u8,
    generator: Generator,
    seed: Option<u64>,
    driver: DriverKind,
}

/// Positional arguments: `[skill] [dfs|prim|kruskal] [seed|random] [wizard|wallfollower]`.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Settings, BoxError> {
    let skill = match args.next() {
        Some(s) => s
            .parse::<u8>()
            .map_err(|_| format!("invalid skill level '{s}'"))?,
        None => 1,
    };
    let generator = match args.next() {
        Some(s) => s.parse::<Generator>()?,
        None => Generator::Dfs,
    };
    let seed = match args.next().as_deref() {
        None | Some("random") => None,
        Some(s) => Some(s.parse::<u64>().map_err(|_| format!("invalid seed '{s}'"))?),
    };
    let driver = match args.next() {
        Some(s) => s.parse::<DriverKind>()?,
        None => DriverKind::Wizard,
    };
    Ok(Settings {
        skill,
        generator,
        seed,
        driver,
    })
}

fn run(settings: Settings) -> Result<(), BoxError> {
    let mut factory = MazeFactory::new(FactoryConfig::default());
    let perfect = settings.driver == DriverKind::WallFollower;
    factory.order(Arc::new(StubOrder::new(
        settings.skill,
        settings.generator,
        perfect,
        settings.seed,
    )))?;
    let maze = factory.wait_till_delivered()?;
    tracing::info!(
        "Delivered {}x{} maze built with {}",
        maze.width(),
        maze.height(),
        settings.generator
    );

    let mut stdout = std::io::stdout();
    render::draw(&mut stdout, &maze, None)?;

    let robot = BasicRobot::with_all_sensors(maze.clone(), RobotConfig::default());
    let (outcome, position, path_length, energy) = match settings.driver {
        DriverKind::Wizard => {
            let mut driver = Wizard::new(robot, maze.clone());
            let outcome = driver.drive_to_exit();
            (
                outcome,
                driver.robot().current_position(),
                driver.path_length(),
                driver.energy_consumption(),
            )
        }
        DriverKind::WallFollower => {
            let mut driver = WallFollower::new(robot, &maze, DriverConfig::default());
            let outcome = driver.drive_to_exit();
            (
                outcome,
                driver.robot().current_position(),
                driver.path_length(),
                driver.energy_consumption(),
            )
        }
    };

    println!();
    render::draw(&mut stdout, &maze, Some(position))?;
    match outcome {
        Ok(true) => println!("Escaped after {path_length} cells using {energy} energy."),
        Ok(false) => println!("Gave up after {path_length} cells, the robot kept circling."),
        Err(e) => println!("Stopped after {path_length} cells: {e}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let _guard = match logging::init("mazebot.log") {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {e}");
            None
        }
    };

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let result = parse_args(args).and_then(run);
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
