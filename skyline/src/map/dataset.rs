use geojson::FeatureCollection;

/// Named collection of features registered with the map host.
///
/// Every replacement of the contents bumps the revision, so the drawing side can tell
/// whether it needs to upload the data again.
#[derive(Debug, Clone)]
pub struct Dataset {
    id: String,
    data: FeatureCollection,
    revision: u64,
}

impl Dataset {
    pub(crate) fn new(id: impl Into<String>, data: FeatureCollection) -> Self {
        Self {
            id: id.into(),
            data,
            revision: 0,
        }
    }

    /// Id of the dataset.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current contents.
    pub fn data(&self) -> &FeatureCollection {
        &self.data
    }

    /// Number of times the contents were replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.data.features.len()
    }

    /// Returns true if the dataset has no features.
    pub fn is_empty(&self) -> bool {
        self.data.features.is_empty()
    }

    pub(crate) fn replace(&mut self, data: FeatureCollection) {
        self.data = data;
        self.revision += 1;
    }
}

/// Feature collection without features.
pub fn empty_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: vec![],
        foreign_members: None,
    }
}
