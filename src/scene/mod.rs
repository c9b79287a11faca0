use crate::host::MeshHost;
use crate::shift::{PropertiesError, ShiftableObject, ShifterProperties};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Handle referencing a mesh object within a [`Scene`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId {
    index: u32,
    generation: u32,
}

impl ObjectId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub const fn index(self) -> u32 {
        self.index
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Default)]
struct ObjectRecord {
    name: String,
    generation: u32,
    alive: bool,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("object {0} is not alive in this scene")]
    NoSuchObject(ObjectId),
    #[error("an object named {0:?} already exists")]
    DuplicateName(String),
    #[error("document references unknown object {0:?}")]
    UnknownObject(String),
    #[error("object {object:?}: {source}")]
    Format {
        object: String,
        #[source]
        source: PropertiesError,
    },
    #[error("scene document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("scene document io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persisted shifter properties for every object, keyed by object name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub objects: BTreeMap<String, ShifterProperties>,
}

/// Mesh objects and the shifter state attached to each.
///
/// Shifter state is created with empty/zero defaults the first time it is
/// requested mutably and is dropped when its object is despawned.
pub struct Scene<H: MeshHost> {
    records: Vec<ObjectRecord>,
    free_list: Vec<u32>,
    meshes: HashMap<ObjectId, H>,
    shifters: HashMap<ObjectId, ShiftableObject>,
}

impl<H: MeshHost> Default for Scene<H> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            free_list: Vec::new(),
            meshes: HashMap::new(),
            shifters: HashMap::new(),
        }
    }
}

impl<H: MeshHost> Scene<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mesh under `name`. Names key the persisted document, so a name
    /// already held by a live object is refused.
    pub fn spawn(&mut self, name: impl Into<String>, mesh: H) -> Result<ObjectId, SceneError> {
        let name = name.into();
        if self.find(&name).is_some() {
            return Err(SceneError::DuplicateName(name));
        }
        let id = if let Some(index) = self.free_list.pop() {
            let record = &mut self.records[index as usize];
            record.alive = true;
            record.name = name;
            ObjectId::new(index, record.generation)
        } else {
            let index = self.records.len() as u32;
            self.records.push(ObjectRecord {
                name,
                generation: 0,
                alive: true,
            });
            ObjectId::new(index, 0)
        };
        self.meshes.insert(id, mesh);
        Ok(id)
    }

    /// Removes the object, discarding its shifter state, and hands the mesh back.
    pub fn despawn(&mut self, id: ObjectId) -> Result<H, SceneError> {
        self.validate(id)?;
        let record = &mut self.records[id.index as usize];
        record.alive = false;
        record.generation = record.generation.wrapping_add(1);
        record.name.clear();
        self.shifters.remove(&id);
        if !self.free_list.contains(&id.index) {
            self.free_list.push(id.index);
        }
        self.meshes.remove(&id).ok_or(SceneError::NoSuchObject(id))
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.records
            .get(id.index as usize)
            .map(|record| record.alive && record.generation == id.generation)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &str)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.alive)
            .map(|(index, record)| (ObjectId::new(index as u32, record.generation), record.name.as_str()))
    }

    pub fn find(&self, name: &str) -> Option<ObjectId> {
        self.records
            .iter()
            .enumerate()
            .find(|(_, record)| record.alive && record.name == name)
            .map(|(index, record)| ObjectId::new(index as u32, record.generation))
    }

    pub fn name(&self, id: ObjectId) -> Option<&str> {
        if !self.contains(id) {
            return None;
        }
        Some(self.records[id.index as usize].name.as_str())
    }

    pub fn mesh(&self, id: ObjectId) -> Option<&H> {
        self.meshes.get(&id)
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Option<&mut H> {
        self.meshes.get_mut(&id)
    }

    /// Shifter state if it has been created for this object.
    pub fn shifter(&self, id: ObjectId) -> Option<&ShiftableObject> {
        self.shifters.get(&id)
    }

    pub fn shifter_mut(&mut self, id: ObjectId) -> Result<&mut ShiftableObject, SceneError> {
        self.validate(id)?;
        Ok(self.shifters.entry(id).or_default())
    }

    /// Shifter state and mesh together, for operations that touch geometry.
    pub fn parts_mut(&mut self, id: ObjectId) -> Result<(&mut ShiftableObject, &mut H), SceneError> {
        self.validate(id)?;
        let mesh = self
            .meshes
            .get_mut(&id)
            .ok_or(SceneError::NoSuchObject(id))?;
        Ok((self.shifters.entry(id).or_default(), mesh))
    }

    pub fn to_document(&self) -> SceneDocument {
        let objects = self
            .shifters
            .iter()
            .filter_map(|(id, shifter)| {
                self.name(*id)
                    .map(|name| (name.to_string(), shifter.to_properties()))
            })
            .collect();
        SceneDocument { objects }
    }

    /// Restores shifter state from a document. Every entry is validated
    /// before any object is touched.
    pub fn apply_document(&mut self, document: &SceneDocument) -> Result<usize, SceneError> {
        let mut decoded = Vec::with_capacity(document.objects.len());
        for (name, props) in &document.objects {
            let id = self
                .find(name)
                .ok_or_else(|| SceneError::UnknownObject(name.clone()))?;
            let shifter = decode_properties(name, props)?;
            decoded.push((id, shifter));
        }

        let count = decoded.len();
        for (id, shifter) in decoded {
            self.shifters.insert(id, shifter);
        }
        log::info!("[scene] restored shifter state for {count} objects");
        Ok(count)
    }

    pub fn save_document(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }

    pub fn load_document(&mut self, json: &str) -> Result<usize, SceneError> {
        let document: SceneDocument = serde_json::from_str(json)?;
        self.apply_document(&document)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), SceneError> {
        let json = self.save_document()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        log::debug!("[scene] wrote document to {}", path.display());
        Ok(())
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<usize, SceneError> {
        let json = std::fs::read_to_string(path)?;
        self.load_document(&json)
    }

    fn validate(&self, id: ObjectId) -> Result<(), SceneError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(SceneError::NoSuchObject(id))
        }
    }
}

fn decode_properties(name: &str, props: &ShifterProperties) -> Result<ShiftableObject, SceneError> {
    ShiftableObject::from_properties(props).map_err(|source| SceneError::Format {
        object: name.to_string(),
        source,
    })
}
