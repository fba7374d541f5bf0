use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Class index {class_index} is outside the label catalog (0..{len})")]
    UnknownClass { class_index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: &'static str,
    pub description: &'static str,
}

/// Class index to human readable label. Indices follow the alphabetical
/// folder order the model was trained with.
const LABELS: [Label; 4] = [
    Label {
        name: "Mild Dementia",
        description: "Early signs of memory loss, slight confusion. Monitoring and early treatment recommended.",
    },
    Label {
        name: "Moderate Dementia",
        description: "Pronounced cognitive decline. Needs regular support and care.",
    },
    Label {
        name: "Non Demented",
        description: "No signs of dementia. Brain appears healthy in the scan.",
    },
    Label {
        name: "Very Mild Dementia",
        description: "Minimal but noticeable memory lapses. Lifestyle and medical advice can help.",
    },
];

#[derive(Debug, Clone)]
pub struct LabelCatalog {
    labels: &'static [Label],
}

impl Default for LabelCatalog {
    fn default() -> Self {
        Self { labels: &LABELS }
    }
}

impl LabelCatalog {
    pub fn describe(&self, class_index: usize) -> Result<&Label, CatalogError> {
        self.labels
            .get(class_index)
            .ok_or(CatalogError::UnknownClass {
                class_index,
                len: self.labels.len(),
            })
    }
}
