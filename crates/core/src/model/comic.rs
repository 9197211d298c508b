//! The comic document root: page pairs plus the cross-cutting scene view.

use indexmap::IndexMap;

use crate::model::page::{Page, PagePair};
use crate::model::panel::Panel;

/// Relation-only reference to a panel: the owning page's index and the
/// panel's position within that page. Never dereferenced blindly;
/// lookups return `Option`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelRef {
    /// 1-based page index.
    pub page: u32,
    /// Position of the panel within the page after ordering.
    pub panel: usize,
}

/// A reconstructed comic. Pair insertion order is the authoritative
/// reading order for the whole document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comic {
    pub name: String,
    pub page_pairs: Vec<PagePair>,
    /// Externally produced panel groupings; this core only stores and
    /// resets them.
    pub scenes: Vec<Vec<PanelRef>>,
    /// Derived narrative text associated with the scenes.
    pub scene_data: String,
}

impl Comic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            page_pairs: Vec::new(),
            scenes: Vec::new(),
            scene_data: String::new(),
        }
    }

    /// Pages in reading order: across pairs, left before right.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.page_pairs.iter().flat_map(PagePair::pages)
    }

    pub fn pages_mut(&mut self) -> impl Iterator<Item = &mut Page> {
        self.page_pairs.iter_mut().flat_map(PagePair::pages_mut)
    }

    pub fn page_count(&self) -> usize {
        self.pages().count()
    }

    pub fn page(&self, index: u32) -> Option<&Page> {
        self.pages().find(|p| p.index == index)
    }

    pub fn page_mut(&mut self, index: u32) -> Option<&mut Page> {
        self.pages_mut().find(|p| p.index == index)
    }

    pub fn panel(&self, r: PanelRef) -> Option<&Panel> {
        self.page(r.page)?.panels.get(r.panel)
    }

    pub fn panel_mut(&mut self, r: PanelRef) -> Option<&mut Panel> {
        self.page_mut(r.page)?.panels.get_mut(r.panel)
    }

    /// Rebuilds the scene view from the `scene_id` tags already stored
    /// on the panels, walking pages in reading order and grouping by
    /// id in order of first appearance. Panels with scene id 0 stay
    /// ungrouped. This reindexes existing tags; it does not invent a
    /// grouping.
    pub fn rebuild_scenes(&mut self) {
        let mut grouped: IndexMap<i32, Vec<PanelRef>> = IndexMap::new();
        for page in self.pages() {
            for (i, panel) in page.panels.iter().enumerate() {
                if panel.scene_id != 0 {
                    grouped.entry(panel.scene_id).or_default().push(PanelRef {
                        page: page.index,
                        panel: i,
                    });
                }
            }
        }
        self.scenes = grouped.into_values().collect();
    }

    /// Clears the scene grouping: every panel referenced by a scene has
    /// its `starting_tag` and `scene_id` reset, then the scene list is
    /// emptied. No-op on a comic with no scenes.
    pub fn reset_scenes(&mut self) {
        let scenes = std::mem::take(&mut self.scenes);
        for scene in &scenes {
            for &r in scene {
                if let Some(panel) = self.panel_mut(r) {
                    panel.starting_tag = false;
                    panel.scene_id = 0;
                }
            }
        }
    }

    /// Clears the entity list of every panel referenced by a scene.
    /// Destructive: entities not retained elsewhere are gone.
    pub fn reset_entities(&mut self) {
        let refs: Vec<PanelRef> = self.scenes.iter().flatten().copied().collect();
        for r in refs {
            if let Some(panel) = self.panel_mut(r) {
                panel.entities.clear();
            }
        }
    }

    /// Renders the scene list as an indented narration script.
    pub fn to_narrative(&self) -> String {
        const INDENT: &str = "     ";
        let mut script = String::new();
        for (i, scene) in self.scenes.iter().enumerate() {
            script.push_str(&format!("Scene {} \n", i + 1));
            for (j, r) in scene.iter().enumerate() {
                let Some(panel) = self.panel(*r) else {
                    continue;
                };
                script.push_str(&format!("{INDENT}Panel {}: {}\n", j + 1, panel.description));
                for bubble in &panel.speech_bubbles {
                    script.push_str(&format!("{INDENT}{INDENT}{}\n", bubble.line()));
                }
            }
        }
        script
    }
}
