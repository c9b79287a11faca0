use serde::{Deserialize, Serialize};
use shifter_engine::host::{HostMode, InMemoryMesh, MeshHost, Position};
use shifter_engine::{ShifterCommand, ShifterConfig, ShifterEditor};
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

/// Headless replay of a shifter session:
/// `shifter_replay <script.json> [document-out.json]`.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("[replay] error: {err}");
        std::process::exit(1);
    }
}

#[derive(Debug, Deserialize)]
struct ReplayScript {
    #[serde(default)]
    config: ShifterConfig,
    objects: Vec<ObjectSpec>,
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct ObjectSpec {
    name: String,
    #[serde(default)]
    positions: Option<Vec<Position>>,
    #[serde(default)]
    cuboid: Option<[Position; 2]>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Step {
    Activate { object: Option<String> },
    Mode { mode: HostMode },
    Select { indices: Vec<u32> },
    Run { command: ShifterCommand },
}

#[derive(Debug, Serialize)]
struct ReplayResult {
    reports: Vec<String>,
    positions: BTreeMap<String, Vec<Position>>,
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let script_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("usage: shifter_replay <script.json> [document-out.json]")?;
    let document_path = env::args().nth(2).map(PathBuf::from);

    let script: ReplayScript = serde_json::from_str(&std::fs::read_to_string(&script_path)?)?;
    let mut editor = ShifterEditor::new(script.config);

    for spec in script.objects {
        let mesh = match (spec.positions, spec.cuboid) {
            (Some(positions), _) => InMemoryMesh::new(positions),
            (None, Some([min, max])) => InMemoryMesh::cuboid(min, max),
            (None, None) => return Err(format!("object {:?} has no geometry", spec.name).into()),
        };
        editor.spawn(spec.name, mesh)?;
    }

    for step in script.steps {
        match step {
            Step::Activate { object } => {
                let id = match object {
                    Some(name) => Some(
                        editor
                            .scene()
                            .find(&name)
                            .ok_or_else(|| format!("unknown object {name:?}"))?,
                    ),
                    None => None,
                };
                editor.set_active(id)?;
            }
            Step::Mode { mode } => {
                if let Some(mesh) = editor.active_mesh_mut() {
                    mesh.set_mode(mode)?;
                }
            }
            Step::Select { indices } => {
                if let Some(mesh) = editor.active_mesh_mut() {
                    mesh.deselect_all();
                    mesh.select(indices);
                }
            }
            Step::Run { command } => {
                editor.execute(command)?;
            }
        }
    }

    let reports = editor
        .status_mut()
        .drain_pending()
        .into_iter()
        .map(|outcome| outcome.summary)
        .collect();

    let mut positions = BTreeMap::new();
    for (id, name) in editor.scene().objects() {
        if let Some(mesh) = editor.scene().mesh(id) {
            positions.insert(name.to_string(), mesh.positions().to_vec());
        }
    }

    if let Some(path) = document_path {
        editor.scene().save_to_path(&path)?;
        println!("[replay] wrote scene document to {}", path.display());
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&ReplayResult { reports, positions })?
    );
    Ok(())
}
