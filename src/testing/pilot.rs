//! Pilot: scripted interaction with a headless [`Gui`].

use crate::error::Result;
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers};
use crate::event::signal::WidgetEvent;
use crate::geometry::Size;
use crate::gui::{Gui, GuiConfig};
use crate::texture::MemoryLoader;
use crate::tree::node::{Widget, WidgetId};

use super::snapshot;

/// Drives a [`Gui`] the way a user would and collects what it reports.
///
/// ```ignore
/// let mut pilot = Pilot::new(200.0, 100.0)?;
/// let ok = pilot.add(Widget::button("OK").sized((60.0, 20.0)))?;
/// pilot.click(10.0, 10.0)?;
/// assert!(pilot.events().contains(&WidgetEvent::Pressed { id: ok }));
/// ```
pub struct Pilot {
    gui: Gui,
}

impl Pilot {
    /// A GUI of the given size with the built-in theme and an empty
    /// in-memory texture loader.
    pub fn new(width: f32, height: f32) -> Result<Self> {
        Self::with_loader(GuiConfig::new().with_viewport(width, height), MemoryLoader::new())
    }

    pub fn with_loader(config: GuiConfig, loader: MemoryLoader) -> Result<Self> {
        Ok(Self { gui: Gui::new(config, loader)? })
    }

    pub fn gui(&self) -> &Gui {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut Gui {
        &mut self.gui
    }

    /// Add a widget under the root.
    pub fn add(&mut self, widget: Widget) -> Result<WidgetId> {
        let root = self.gui.root();
        self.gui.add(root, widget)
    }

    // -- input ---------------------------------------------------------------

    pub fn press_key(&mut self, key: Key) -> Result<bool> {
        self.gui.handle_event(InputEvent::key(key))
    }

    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> Result<bool> {
        self.gui.handle_event(InputEvent::Key(KeyEvent::new(key, modifiers)))
    }

    pub fn hover(&mut self, x: f32, y: f32) -> Result<bool> {
        self.gui.handle_event(InputEvent::mouse_move(x, y))
    }

    /// Left-button press and release at the same point.
    pub fn click(&mut self, x: f32, y: f32) -> Result<bool> {
        self.gui.handle_event(InputEvent::mouse_down(x, y))?;
        self.gui.handle_event(InputEvent::mouse_up(x, y))
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        self.gui.resize(Size::new(width, height))
    }

    // -- output --------------------------------------------------------------

    /// Events emitted since the last call.
    pub fn events(&mut self) -> Vec<WidgetEvent> {
        self.gui.poll_events()
    }

    /// Resolve textures, then paint to a draw list string.
    pub async fn render(&mut self) -> Result<String> {
        self.gui.prepare_textures().await?;
        snapshot::render_to_string(&mut self.gui)
    }

    /// Lay out and return the tree outline.
    pub fn outline(&mut self) -> Result<String> {
        self.gui.layout()?;
        Ok(snapshot::tree_to_string(self.gui.tree()))
    }
}
