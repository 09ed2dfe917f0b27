use std::{
    collections::BTreeMap,
    io::Write as _,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use novagfx::{
    EvalQuery, Evaluator, FrameQueue, LayerId, Library, Phase, PlayoutConfig, PlayoutEngine,
    Project, RecordingTarget, TemplateId, VirtualClock,
};

#[derive(Parser, Debug)]
#[command(name = "novagfx", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one element's animated properties at an instant.
    Eval(EvalArgs),
    /// Run a layer on a virtual fixed-step clock and print one JSON line per frame.
    Simulate(SimulateArgs),
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    template: String,

    #[arg(long)]
    element: String,

    #[arg(long, value_enum, default_value_t = PhaseChoice::In)]
    phase: PhaseChoice,

    /// Milliseconds since the phase started (or playhead position with --scrub).
    #[arg(long)]
    time_ms: f64,

    /// Treat --time-ms as an authoring playhead instead of live elapsed time.
    #[arg(long)]
    scrub: bool,

    /// Override the phase duration instead of using the template/project value.
    #[arg(long)]
    phase_duration_ms: Option<f64>,

    /// Also print the computed transform as an affine matrix.
    #[arg(long)]
    matrix: bool,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    template: String,

    /// Optional playout config JSON (phase durations, layers).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "main")]
    layer: String,

    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Stop after this much virtual time, or earlier once the layer goes idle.
    #[arg(long, default_value_t = 10_000.0)]
    duration_ms: f64,

    /// Trigger the out phase at this virtual time.
    #[arg(long)]
    out_at_ms: Option<f64>,

    /// Queue this template to replace the current one when its out phase completes.
    #[arg(long)]
    switch_to: Option<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PhaseChoice {
    In,
    Loop,
    Out,
}

impl From<PhaseChoice> for Phase {
    fn from(p: PhaseChoice) -> Self {
        match p {
            PhaseChoice::In => Phase::In,
            PhaseChoice::Loop => Phase::Loop,
            PhaseChoice::Out => Phase::Out,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Eval(args) => cmd_eval(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_library(path: &Path) -> anyhow::Result<Library> {
    let project = Project::from_path(path)?;
    let library = Library::compile(&project)
        .with_context(|| format!("compile project '{}'", path.display()))?;
    Ok(library)
}

fn cmd_eval(args: EvalArgs) -> anyhow::Result<()> {
    let library = load_library(&args.in_path)?;
    let template_id = TemplateId::from(args.template);
    let template = library
        .template(&template_id)
        .with_context(|| format!("unknown template '{template_id}'"))?;

    let phase = Phase::from(args.phase);
    let phase_duration_ms = args.phase_duration_ms.unwrap_or_else(|| {
        template
            .phase_durations()
            .unwrap_or(library.phase_durations())
            .get(phase)
    });
    let query = if args.scrub {
        EvalQuery::scrub(phase, args.time_ms, phase_duration_ms)
    } else {
        EvalQuery::live(phase, args.time_ms, phase_duration_ms)
    };

    let frame = Evaluator::eval_template(template, &query);
    let element = frame
        .elements
        .iter()
        .find(|el| el.element_id.as_str() == args.element)
        .with_context(|| {
            format!(
                "template '{template_id}' has no element '{}'",
                args.element
            )
        })?;

    let mut out = serde_json::json!({
        "template": template_id,
        "element": element.element_id,
        "phase": phase,
        "time_ms": args.time_ms,
        "position": element.position,
        "properties": element.properties,
    });
    if args.matrix {
        out["matrix"] = match element.transform_affine() {
            Some(affine) => serde_json::json!(affine.as_coeffs()),
            None => serde_json::Value::Null,
        };
    }

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &out).with_context(|| "write eval JSON")?;
    writeln!(stdout)?;
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be a positive number, got {}", args.fps);
    }

    let library = Arc::new(load_library(&args.in_path)?);
    let config = match &args.config {
        Some(path) => PlayoutConfig::from_path(path)?,
        None => PlayoutConfig::default(),
    };

    let layer = LayerId::from(args.layer);
    let template = TemplateId::from(args.template);
    let mut engine = PlayoutEngine::new(library, config, FrameQueue::new(), RecordingTarget::new());
    if !engine.layers().any(|l| *l == layer) {
        engine.add_layer(layer.clone())?;
    }

    let mut clock = VirtualClock::from_fps(args.fps);
    engine.play(&layer, &template, Phase::In, clock.now_ms())?;

    let mut out_sent = false;
    let mut stdout = std::io::stdout().lock();
    while clock.now_ms() < args.duration_ms {
        let now = clock.advance();

        if !out_sent && args.out_at_ms.is_some_and(|at| now >= at) {
            out_sent = true;
            if let Some(next) = &args.switch_to {
                engine.queue_switch(&layer, &TemplateId::from(next.as_str()), now)?;
            }
            engine.animate_out(&layer, now)?;
        }

        let outcomes: Vec<serde_json::Value> = engine
            .run_frame(now)
            .into_iter()
            .map(|(l, res)| match res {
                Ok(outcome) => serde_json::json!({"layer": l, "outcome": outcome}),
                Err(err) => serde_json::json!({"layer": l, "error": err.to_string()}),
            })
            .collect();

        let styles: BTreeMap<_, _> = engine.target().layer_styles(&layer).collect();
        let state = engine.state(&layer);
        let line = serde_json::json!({
            "frame": clock.frames(),
            "time_ms": now,
            "phase": state.as_ref().map(|s| s.phase),
            "template": state.as_ref().map(|s| s.template_id.clone()),
            "outcomes": outcomes,
            "styles": styles,
        });
        serde_json::to_writer(&mut stdout, &line).with_context(|| "write frame JSON")?;
        writeln!(stdout)?;

        if state.is_none() && engine.scheduler().pending_len() == 0 {
            tracing::info!(frames = clock.frames(), "layer idle, simulation done");
            break;
        }
    }
    Ok(())
}
