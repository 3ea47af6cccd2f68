//! Maze construction orchestration.
//!
//! An [`Order`] names a skill level, a generator, whether the maze must be perfect and
//! an optional seed. [`MazeFactory`] runs the generation pipeline for it on a worker
//! thread and hands the finished [`Maze`] back over a channel, calling
//! [`Order::deliver`] on the way.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, AtomicU8, Ordering},
    mpsc::{Receiver, TryRecvError},
};
use std::thread::JoinHandle;

use crate::config::FactoryConfig;
use crate::error::FactoryError;
use crate::generators::{Generator, carve_rooms, generate_floorplan, get_rng, place_exit};
use crate::maze::Maze;

/// What a caller wants built, and where the result goes.
pub trait Order: Send + Sync {
    fn skill_level(&self) -> u8;
    fn builder(&self) -> Generator;
    /// A perfect maze has no rooms, so its passages form exactly a spanning tree.
    fn is_perfect(&self) -> bool;
    /// `None` draws the seed from the operating system.
    fn seed(&self) -> Option<u64>;
    fn deliver(&self, maze: Arc<Maze>);
    /// Advisory progress in percent. Granularity is not guaranteed.
    fn update_progress(&self, percentage: u8);
}

/// An order that simply keeps whatever it is handed.
#[derive(Debug)]
pub struct StubOrder {
    skill_level: u8,
    builder: Generator,
    perfect: bool,
    seed: Option<u64>,
    maze: Mutex<Option<Arc<Maze>>>,
    progress: AtomicU8,
}

impl StubOrder {
    pub fn new(skill_level: u8, builder: Generator, perfect: bool, seed: Option<u64>) -> Self {
        StubOrder {
            skill_level,
            builder,
            perfect,
            seed,
            maze: Mutex::new(None),
            progress: AtomicU8::new(0),
        }
    }

    /// The delivered maze, if any.
    pub fn maze(&self) -> Option<Arc<Maze>> {
        self.maze
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Last reported progress in percent.
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Relaxed)
    }
}

impl Order for StubOrder {
    fn skill_level(&self) -> u8 {
        self.skill_level
    }

    fn builder(&self) -> Generator {
        self.builder
    }

    fn is_perfect(&self) -> bool {
        self.perfect
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn deliver(&self, maze: Arc<Maze>) {
        *self.maze.lock().unwrap_or_else(PoisonError::into_inner) = Some(maze);
    }

    fn update_progress(&self, percentage: u8) {
        self.progress.store(percentage, Ordering::Relaxed);
    }
}

fn check_cancelled(cancel: &AtomicBool) -> Result<(), FactoryError> {
    if cancel.load(Ordering::Relaxed) {
        Err(FactoryError::Cancelled)
    } else {
        Ok(())
    }
}

/// Runs the whole pipeline synchronously: spanning tree, optional rooms, exit
/// placement, then the distance field. `cancel` is checked between stages.
pub fn build_maze(
    config: &FactoryConfig,
    order: &dyn Order,
    cancel: &AtomicBool,
) -> Result<Maze, FactoryError> {
    let level = order.skill_level();
    let (width, height) = config.skill_table.dimensions(level)?;
    let mut rng = get_rng(order.seed());
    order.update_progress(0);

    let mut floorplan = generate_floorplan(width, height, order.builder(), &mut rng)?;
    check_cancelled(cancel)?;
    order.update_progress(60);

    if !order.is_perfect() {
        let rooms = config.skill_table.rooms(level)?;
        carve_rooms(
            &mut floorplan,
            &mut rng,
            rooms,
            rooms * config.room_attempts_per_room,
            config.max_room_size,
        );
    }
    check_cancelled(cancel)?;
    order.update_progress(75);

    let exit = place_exit(&mut floorplan, &mut rng)?;
    tracing::debug!("[factory] exit placed at {:?}", exit);
    check_cancelled(cancel)?;
    order.update_progress(90);

    let maze = Maze::from_floorplan(floorplan)?;
    order.update_progress(100);
    Ok(maze)
}

type Delivery = Result<Arc<Maze>, FactoryError>;

/// An order in flight, or one whose result has not been collected yet.
struct Pending {
    handle: Option<JoinHandle<()>>,
    receiver: Receiver<Delivery>,
    cancel: Arc<AtomicBool>,
}

impl Pending {
    fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn finish(mut self, delivery: Delivery) -> Delivery {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                return Err(FactoryError::WorkerPanicked);
            }
        }
        delivery
    }
}

/// Builds mazes one order at a time on a background thread.
#[derive(Default)]
pub struct MazeFactory {
    config: Arc<FactoryConfig>,
    pending: Option<Pending>,
}

impl MazeFactory {
    pub fn new(config: FactoryConfig) -> Self {
        MazeFactory {
            config: Arc::new(config),
            pending: None,
        }
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Whether a worker is still building the previous order.
    pub fn is_busy(&self) -> bool {
        self.pending.as_ref().is_some_and(Pending::is_running)
    }

    /// Starts building `order` in the background.
    ///
    /// Fails with [`FactoryError::Busy`] while another order is being built, and
    /// with a configuration error if the skill level is unknown. An uncollected
    /// result from an earlier order is discarded.
    pub fn order<O: Order + 'static>(&mut self, order: Arc<O>) -> Result<(), FactoryError> {
        if self.is_busy() {
            return Err(FactoryError::Busy);
        }
        self.config.skill_table.dimensions(order.skill_level())?;
        if let Some(stale) = self.pending.take() {
            let _ = stale.finish(Err(FactoryError::Cancelled));
        }

        tracing::info!(
            "[factory] ordering skill {} maze with {} (perfect: {}, seed: {:?})",
            order.skill_level(),
            order.builder(),
            order.is_perfect(),
            order.seed()
        );

        let (tx, rx) = std::sync::mpsc::channel::<Delivery>();
        let cancel = Arc::new(AtomicBool::new(false));
        let config = Arc::clone(&self.config);
        let cancel_flag = Arc::clone(&cancel);

        let handle = std::thread::spawn(move || {
            let result = build_maze(&config, &*order, &cancel_flag).map(Arc::new);
            match &result {
                Ok(maze) => {
                    tracing::debug!(
                        "[factory] delivering {}x{} maze",
                        maze.width(),
                        maze.height()
                    );
                    order.deliver(Arc::clone(maze));
                }
                Err(e) => tracing::warn!("[factory] order failed: {}", e),
            }
            // The caller may have dropped the factory already
            let _ = tx.send(result);
        });

        self.pending = Some(Pending {
            handle: Some(handle),
            receiver: rx,
            cancel,
        });
        Ok(())
    }

    /// Asks the running order to stop at the next stage boundary.
    pub fn cancel(&self) {
        if let Some(pending) = &self.pending {
            pending.cancel.store(true, Ordering::Relaxed);
        }
    }

    /// Blocks until the current order is delivered and returns the maze.
    pub fn wait_till_delivered(&mut self) -> Result<Arc<Maze>, FactoryError> {
        let pending = self.pending.take().ok_or(FactoryError::NothingOrdered)?;
        let delivery = pending
            .receiver
            .recv()
            .unwrap_or(Err(FactoryError::WorkerPanicked));
        pending.finish(delivery)
    }

    /// Returns the delivery if it is ready, without blocking.
    pub fn try_delivered(&mut self) -> Option<Result<Arc<Maze>, FactoryError>> {
        let delivery = match self.pending.as_ref()?.receiver.try_recv() {
            Ok(delivery) => delivery,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(FactoryError::WorkerPanicked),
        };
        let pending = self.pending.take()?;
        Some(pending.finish(delivery))
    }

    /// Hands an already built maze, e.g. one loaded from storage, straight to
    /// `order`, bypassing generation. A following [`MazeFactory::wait_till_delivered`]
    /// returns it as well.
    pub fn deliver_loaded(&mut self, order: &dyn Order, maze: Maze) -> Result<Arc<Maze>, FactoryError> {
        if self.is_busy() {
            return Err(FactoryError::Busy);
        }
        let maze = Arc::new(maze);
        order.update_progress(100);
        order.deliver(Arc::clone(&maze));

        let (tx, rx) = std::sync::mpsc::channel::<Delivery>();
        let _ = tx.send(Ok(Arc::clone(&maze)));
        self.pending = Some(Pending {
            handle: None,
            receiver: rx,
            cancel: Arc::new(AtomicBool::new(false)),
        });
        Ok(maze)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{Sender, channel};

    use super::*;
    use crate::config::SkillTable;
    use crate::error::ConfigError;
    use crate::maze::{CardinalDirection, Floorplan, Wallboard};

    fn make_maze(skill: u8, builder: Generator, perfect: bool, seed: u64) -> Arc<Maze> {
        let order = Arc::new(StubOrder::new(skill, builder, perfect, Some(seed)));
        let mut factory = MazeFactory::default();
        factory.order(Arc::clone(&order)).unwrap();
        let maze = factory.wait_till_delivered().unwrap();
        assert_eq!(order.maze(), Some(Arc::clone(&maze)));
        assert_eq!(order.progress(), 100);
        maze
    }

    fn count_exits(maze: &Maze) -> usize {
        let floorplan = maze.floorplan();
        let (width, height) = (floorplan.width(), floorplan.height());
        (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| {
                CardinalDirection::ALL
                    .into_iter()
                    .filter(|&dir| {
                        floorplan.is_border(x, y, dir).unwrap()
                            && !floorplan.has_wall(x, y, dir).unwrap()
                    })
                    .count()
            })
            .sum()
    }

    fn assert_distances_descend(maze: &Maze) {
        let floorplan = maze.floorplan();
        for y in 0..maze.height() {
            for x in 0..maze.width() {
                let distance = maze.distance_to_exit(x, y).unwrap();
                if distance == 0 {
                    assert!(floorplan.is_exit_position(x, y).unwrap());
                    continue;
                }
                let has_closer_neighbor = floorplan
                    .open_neighbors((x, y))
                    .any(|(_, (nx, ny))| maze.distance_to_exit(nx, ny).unwrap() == distance - 1);
                assert!(has_closer_neighbor, "({x}, {y}) has no neighbor closer to the exit");
            }
        }
    }

    #[test]
    fn test_exactly_one_exit() {
        for builder in Generator::ALL {
            for perfect in [true, false] {
                let maze = make_maze(5, builder, perfect, 15);
                assert_eq!(count_exits(&maze), 1);
            }
        }
    }

    #[test]
    fn test_perfect_maze_is_spanning_tree() {
        for builder in Generator::ALL {
            let maze = make_maze(5, builder, true, 20);
            assert_eq!((maze.width(), maze.height()), (25, 25));
            assert!(maze.floorplan().rooms().is_empty());
            assert_eq!(
                maze.floorplan().open_internal_wallboards(),
                maze.floorplan().cell_count() - 1
            );
        }
    }

    #[test]
    fn test_all_cells_reach_exit() {
        for builder in Generator::ALL {
            for perfect in [true, false] {
                assert_distances_descend(&make_maze(3, builder, perfect, 20));
            }
        }
    }

    #[test]
    fn test_imperfect_maze_has_rooms() {
        for builder in Generator::ALL {
            let maze = make_maze(5, builder, false, 20);
            assert!(maze.floorplan().area_overlaps_with_room(1, 1, 23, 23).unwrap());
        }
    }

    #[test]
    fn test_start_is_farthest_cell() {
        let maze = make_maze(2, Generator::Prim, true, 56);
        let (sx, sy) = maze.start_position();
        let start_distance = maze.distance_to_exit(sx, sy).unwrap();
        assert!(
            maze.distance_field()
                .all_distance_values()
                .iter()
                .all(|&d| d <= start_distance)
        );
    }

    #[test]
    fn test_seeds() {
        for builder in Generator::ALL {
            let first = make_maze(2, builder, true, 10);
            let again = make_maze(2, builder, true, 10);
            let other = make_maze(2, builder, true, 20);
            assert_eq!(first, again);
            assert_ne!(first.floorplan(), other.floorplan());
        }
    }

    #[test]
    fn test_unknown_skill_fails_fast() {
        let mut factory = MazeFactory::default();
        let order = Arc::new(StubOrder::new(99, Generator::Dfs, true, Some(1)));
        assert_eq!(
            factory.order(order),
            Err(FactoryError::Config(ConfigError::UnknownSkillLevel {
                level: 99,
                max: 15
            }))
        );
        assert_eq!(
            factory.wait_till_delivered(),
            Err(FactoryError::NothingOrdered)
        );
    }

    /// Blocks the pipeline at its first progress report until the test releases it.
    struct GatedOrder {
        inner: StubOrder,
        gate: Mutex<Receiver<()>>,
    }

    impl GatedOrder {
        fn new() -> (Arc<Self>, Sender<()>) {
            let (tx, rx) = channel();
            let order = GatedOrder {
                inner: StubOrder::new(1, Generator::Kruskal, true, Some(3)),
                gate: Mutex::new(rx),
            };
            (Arc::new(order), tx)
        }
    }

    impl Order for GatedOrder {
        fn skill_level(&self) -> u8 {
            self.inner.skill_level()
        }
        fn builder(&self) -> Generator {
            self.inner.builder()
        }
        fn is_perfect(&self) -> bool {
            self.inner.is_perfect()
        }
        fn seed(&self) -> Option<u64> {
            self.inner.seed()
        }
        fn deliver(&self, maze: Arc<Maze>) {
            self.inner.deliver(maze)
        }
        fn update_progress(&self, percentage: u8) {
            if percentage == 0 {
                let _ = self.gate.lock().unwrap().recv();
            }
            self.inner.update_progress(percentage)
        }
    }

    #[test]
    fn test_busy_while_building() {
        let (gated, release) = GatedOrder::new();
        let mut factory = MazeFactory::default();
        factory.order(Arc::clone(&gated)).unwrap();
        assert!(factory.is_busy());
        assert!(factory.try_delivered().is_none());
        let second = Arc::new(StubOrder::new(0, Generator::Dfs, true, Some(1)));
        assert_eq!(factory.order(second), Err(FactoryError::Busy));

        release.send(()).unwrap();
        let maze = factory.wait_till_delivered().unwrap();
        assert_eq!(gated.inner.maze(), Some(maze));
        assert!(!factory.is_busy());
    }

    #[test]
    fn test_cancel() {
        let (gated, release) = GatedOrder::new();
        let mut factory = MazeFactory::default();
        factory.order(Arc::clone(&gated)).unwrap();
        factory.cancel();
        release.send(()).unwrap();
        assert_eq!(factory.wait_till_delivered(), Err(FactoryError::Cancelled));
        assert_eq!(gated.inner.maze(), None);
    }

    #[test]
    fn test_try_delivered_eventually_returns() {
        let order = Arc::new(StubOrder::new(0, Generator::Prim, false, Some(8)));
        let mut factory = MazeFactory::default();
        factory.order(Arc::clone(&order)).unwrap();
        let maze = loop {
            if let Some(delivery) = factory.try_delivered() {
                break delivery.unwrap();
            }
            std::thread::yield_now();
        };
        assert_eq!(maze.width(), 4);
        assert!(factory.try_delivered().is_none());
    }

    #[test]
    fn test_deliver_loaded() {
        let mut floorplan = Floorplan::new(2, 1).unwrap();
        floorplan
            .delete_wallboard(Wallboard::new(0, 0, CardinalDirection::East))
            .unwrap();
        floorplan.set_exit_position(1, 0).unwrap();
        let maze = Maze::from_floorplan(floorplan).unwrap();

        let order = StubOrder::new(0, Generator::Dfs, true, None);
        let mut factory = MazeFactory::default();
        let delivered = factory.deliver_loaded(&order, maze.clone()).unwrap();
        assert_eq!(*delivered, maze);
        assert_eq!(order.maze(), Some(Arc::clone(&delivered)));
        assert_eq!(factory.wait_till_delivered(), Ok(delivered));
    }

    #[test]
    fn test_custom_config() {
        let config = FactoryConfig {
            skill_table: SkillTable::new(&[(7, 3, 0)]),
            ..FactoryConfig::default()
        };
        let mut factory = MazeFactory::new(config);
        let order = Arc::new(StubOrder::new(0, Generator::Dfs, false, Some(2)));
        factory.order(order).unwrap();
        let maze = factory.wait_till_delivered().unwrap();
        assert_eq!((maze.width(), maze.height()), (7, 3));
    }
}
