use std::{
    error::Error,
    io::BufRead,
    path::{Path, PathBuf},
};

use agv_core::{
    mk_static,
    utils::{
        cmd_vel_listener,
        connection::{
            cmd_vel_topic,
            messages::TfMessage,
            subscriber::submit,
        },
        controllers::{DriveParams, WheelSide},
        frames::{BroadcastConfig, NodeId, SceneDescription, TransformPublisher},
        math::transform::FrameConvention,
        CmdVelChannel, ControlMode, DriveConfig, DriveController, Drivetrain, FrameTree,
        SceneArena, TfBroadcaster, WheelActuator,
    },
};
use clap::{Parser, ValueEnum};
use embassy_executor::Executor;
use embassy_time::{Duration, Instant, Ticker};
use serde::Deserialize;
use static_cell::StaticCell;
use tracing::{error, info};

const DEFAULT_SCENE: &str = include_str!("../scenes/agv.json");

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Keyboard,
    Command,
}

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    /// JSON file with `drive` and `broadcast` sections
    #[clap(long)]
    config: Option<PathBuf>,
    /// JSON scene description (defaults to the bundled AGV)
    #[clap(long)]
    scene: Option<PathBuf>,
    /// input source for the drive controller
    #[clap(long, value_enum)]
    mode: Option<Mode>,
    #[clap(long)]
    namespace: Option<String>,
    /// fixed drive tick rate
    #[clap(long, default_value_t = 50)]
    tick_hz: u32,
    /// TF publish rate
    #[clap(long)]
    tf_hz: Option<f32>,
    /// parent frame of the tree root
    #[clap(long)]
    root_frame: Option<String>,
    /// frame name prefix
    #[clap(long)]
    prefix: Option<String>,
    /// publish poses converted from engine RUF to ROS FLU
    #[clap(long)]
    flu: bool,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct SimConfig {
    drive: DriveConfig,
    broadcast: BroadcastConfig,
}

impl SimConfig {
    fn load(opts: &Opts) -> Result<Self, Box<dyn Error>> {
        let mut cfg: SimConfig = match &opts.config {
            Some(path) => read_json(path)?,
            None => SimConfig::default(),
        };
        if let Some(mode) = opts.mode {
            cfg.drive.mode = match mode {
                Mode::Keyboard => ControlMode::Keyboard,
                Mode::Command => ControlMode::ExternalCommand,
            };
        }
        if let Some(ns) = &opts.namespace {
            cfg.drive.namespace = ns.clone();
        }
        if let Some(hz) = opts.tf_hz {
            cfg.broadcast.publish_hz = hz;
        }
        if let Some(root) = &opts.root_frame {
            cfg.broadcast.root_frame = root.clone();
        }
        if let Some(prefix) = &opts.prefix {
            cfg.broadcast.prefix = prefix.clone();
        }
        if opts.flu {
            cfg.broadcast.convention = FrameConvention::RufToFlu;
        }
        Ok(cfg)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, Box<dyn Error>> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Wheel joint that logs its target whenever it changes.
struct LoggingWheel {
    side: WheelSide,
    target: f32,
}

impl LoggingWheel {
    fn new(side: WheelSide) -> Self {
        Self { side, target: 0.0 }
    }
}

impl WheelActuator for LoggingWheel {
    fn configure(
        &mut self,
        params: DriveParams,
    ) {
        info!(side = ?self.side, ?params, "wheel drive configured");
    }

    fn set_target_angular_velocity(
        &mut self,
        value: f32,
    ) {
        if value != self.target {
            info!(side = ?self.side, deg_per_s = value, "wheel target");
            self.target = value;
        }
    }
}

/// Writes each TF batch to stdout as one JSON line.
struct StdoutPublisher;

impl TransformPublisher for StdoutPublisher {
    fn publish(
        &mut self,
        message: TfMessage,
    ) {
        match message.to_json() {
            Ok(line) => println!("{}", line),
            Err(e) => error!("TF encode failed: {}", e),
        }
    }
}

#[embassy_executor::task]
async fn drive_task(
    controller: &'static DriveController,
    mut drivetrain: Drivetrain<LoggingWheel>,
    period: Duration,
) -> ! {
    let mut ticker = Ticker::every(period);
    loop {
        drivetrain.drive(controller, Instant::now());
        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn cmd_vel_task(
    channel: &'static CmdVelChannel,
    controller: &'static DriveController,
) -> ! {
    cmd_vel_listener(channel, controller, Instant::now).await
}

#[embassy_executor::task]
async fn tf_task(
    scene: &'static SceneArena,
    tree: FrameTree<NodeId>,
    mut tf: TfBroadcaster<StdoutPublisher>,
) -> ! {
    let mut ticker = Ticker::every(tf.config().publish_period());
    loop {
        tf.broadcast(&tree, scene, Instant::now());
        ticker.next().await;
    }
}

/// Teleop from stdin. In command mode each line is a Twist JSON document, in
/// keyboard mode each line is `<vertical> <horizontal>`.
fn spawn_stdin_reader(
    channel: &'static CmdVelChannel,
    controller: &'static DriveController,
) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("stdin closed: {}", e);
                    break;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match controller.mode() {
                ControlMode::ExternalCommand => match submit(channel, line.as_bytes()) {
                    Ok(true) => {}
                    Ok(false) => error!("cmd_vel dropped, controller is not keeping up"),
                    Err(e) => error!("ignoring line {:?}: {}", line, e),
                },
                ControlMode::Keyboard => {
                    let mut axes = line.split_whitespace().map(str::parse::<f32>);
                    match (axes.next(), axes.next()) {
                        (Some(Ok(vertical)), Some(Ok(horizontal))) => {
                            controller.set_keyboard_axes(vertical, horizontal)
                        }
                        _ => error!("expected `<vertical> <horizontal>`, got {:?}", line),
                    }
                }
            }
        }
    });
}

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opts: Opts = Opts::parse();
    let cfg = match SimConfig::load(&opts) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    let description: SceneDescription = match &opts.scene {
        Some(path) => read_json(path),
        None => serde_json::from_str(DEFAULT_SCENE).map_err(Into::into),
    }
    .unwrap_or_else(|e| {
        error!("failed to load scene: {}", e);
        std::process::exit(1);
    });

    let controller: &'static DriveController = match DriveController::new(&cfg.drive) {
        Ok(c) => mk_static!(DriveController, c),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let drivetrain = match Drivetrain::new(
        Some(LoggingWheel::new(WheelSide::Left)),
        Some(LoggingWheel::new(WheelSide::Right)),
        &cfg.drive,
    ) {
        Ok(dt) => dt,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let (scene, root) = SceneArena::from_description(&description);
    let scene: &'static SceneArena = mk_static!(SceneArena, scene);
    let tree = FrameTree::build(scene, root, &cfg.broadcast.prefix);
    let tf = TfBroadcaster::new(cfg.broadcast.clone(), StdoutPublisher);

    // one queue per namespace
    let cmd_vel: &'static CmdVelChannel = mk_static!(CmdVelChannel, CmdVelChannel::new());
    let tick = Duration::from_micros(1_000_000 / u64::from(opts.tick_hz.max(1)));
    match controller.mode() {
        ControlMode::ExternalCommand => {
            info!("listening on {}", cmd_vel_topic(&cfg.drive.namespace))
        }
        ControlMode::Keyboard => info!("keyboard teleop: `<vertical> <horizontal>` per line"),
    }
    spawn_stdin_reader(cmd_vel, controller);

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(drive_task(controller, drivetrain, tick)).unwrap();
        spawner.spawn(cmd_vel_task(cmd_vel, controller)).unwrap();
        spawner.spawn(tf_task(scene, tree, tf)).unwrap();
    });
}
