//! Block catalog: the fixed set of canvas blocks
//!
//! Loaded once at startup and never mutated. Only the item sequences of
//! the blocks change at runtime.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Static description of one canvas block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    /// Stable identifier (e.g. "value-propositions")
    pub id: String,
    /// Display title, also used as the heading in exports
    pub title: String,
    /// Short guidance shown under the title
    #[serde(default)]
    pub description: String,
    /// Presentation hint, opaque to the core
    #[serde(default)]
    pub color: String,
}

impl BlockSpec {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            color: color.into(),
        }
    }
}

/// Ordered, immutable list of blocks. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCatalog {
    blocks: Arc<[BlockSpec]>,
}

impl BlockCatalog {
    pub fn new(blocks: Vec<BlockSpec>) -> Self {
        Self {
            blocks: blocks.into(),
        }
    }

    /// The nine blocks of the Business Model Canvas, in canvas order.
    pub fn business_model_canvas() -> Self {
        Self::new(vec![
            BlockSpec::new(
                "key-partners",
                "Kulcspartnerek",
                "Kik a legfontosabb partnerek és beszállítók?",
                "#e0f2fe",
            ),
            BlockSpec::new(
                "key-activities",
                "Kulcstevékenységek",
                "Milyen tevékenységek szükségesek az értékajánlathoz?",
                "#ede9fe",
            ),
            BlockSpec::new(
                "key-resources",
                "Kulcserőforrások",
                "Milyen erőforrásokra épül az üzleti modell?",
                "#fae8ff",
            ),
            BlockSpec::new(
                "value-propositions",
                "Értékajánlat",
                "Milyen értéket nyújtunk az ügyfeleknek?",
                "#fef3c7",
            ),
            BlockSpec::new(
                "customer-relationships",
                "Ügyfélkapcsolatok",
                "Milyen kapcsolatot alakítunk ki az ügyfelekkel?",
                "#dcfce7",
            ),
            BlockSpec::new(
                "channels",
                "Csatornák",
                "Milyen csatornákon érjük el az ügyfeleket?",
                "#ccfbf1",
            ),
            BlockSpec::new(
                "customer-segments",
                "Ügyfélszegmensek",
                "Kiknek teremtünk értéket?",
                "#ffe4e6",
            ),
            BlockSpec::new(
                "cost-structure",
                "Költségszerkezet",
                "Melyek a legjelentősebb költségek?",
                "#f1f5f9",
            ),
            BlockSpec::new(
                "revenue-streams",
                "Bevételi források",
                "Miért és hogyan fizetnek az ügyfelek?",
                "#ecfccb",
            ),
        ])
    }

    pub fn get(&self, id: &str) -> Option<&BlockSpec> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn find_by_title(&self, title: &str) -> Option<&BlockSpec> {
        self.blocks.iter().find(|b| b.title == title)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockSpec> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::business_model_canvas()
    }
}
