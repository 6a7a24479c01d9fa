//! Gui: the widget tree with its theme, textures, layout and input state.
//!
//! [`Gui`] ties the pieces together the way an application uses them: widgets
//! added through it are styled from the current theme, textures are acquired
//! through one shared [`TextureManager`], layout is recomputed lazily, and
//! input goes through the [`EventDispatcher`] into [`Signals`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::event::dispatch::EventDispatcher;
use crate::event::input::InputEvent;
use crate::event::signal::{ConnectionId, SignalKind, Signals, WidgetEvent, DEFAULT_QUEUE_LIMIT};
use crate::geometry::{Offset, Size};
use crate::layout::engine::LayoutEngine;
use crate::layout::spatial::SpatialMap;
use crate::render::paint::{Painter, DEFAULT_TEXT_SIZE};
use crate::render::target::RenderTarget;
use crate::renderer::TextureRef;
use crate::texture::{TextureKey, TextureLoader, TextureManager};
use crate::theme::Theme;
use crate::tree::node::{Widget, WidgetId};
use crate::tree::tree::WidgetTree;
use crate::widget::LifecycleEvent;

// ---------------------------------------------------------------------------
// GuiConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Gui`].
///
/// Built in code or read from TOML:
///
/// ```toml
/// width = 800
/// height = 600
/// resource_path = "assets"
/// theme_path = "assets/black.theme"
/// text_size = 14
/// placeholder_fallback = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuiConfig {
    /// Viewport width.
    pub width: f32,
    /// Viewport height.
    pub height: f32,
    /// Directory that relative texture ids are resolved against. Ids from a
    /// theme file are resolved against the file's directory instead.
    pub resource_path: Option<PathBuf>,
    /// Theme file loaded instead of the built-in theme.
    pub theme_path: Option<PathBuf>,
    /// Text size for widgets whose renderer sets none.
    pub text_size: f32,
    /// Replace missing textures with the placeholder instead of failing.
    pub placeholder_fallback: bool,
    /// Events kept for [`Gui::poll_events`]; the oldest are dropped beyond
    /// this. 0 delivers events to callbacks only.
    pub event_queue_limit: usize,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            resource_path: None,
            theme_path: None,
            text_size: DEFAULT_TEXT_SIZE,
            placeholder_fallback: true,
            event_queue_limit: DEFAULT_QUEUE_LIMIT,
        }
    }
}

impl GuiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML configuration. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GuiConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_resource_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.resource_path = Some(path.into());
        self
    }

    pub fn with_theme_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.theme_path = Some(path.into());
        self
    }

    pub fn with_text_size(mut self, size: f32) -> Self {
        self.text_size = size;
        self
    }

    pub fn with_placeholder_fallback(mut self, enabled: bool) -> Self {
        self.placeholder_fallback = enabled;
        self
    }

    pub fn with_event_queue_limit(mut self, limit: usize) -> Self {
        self.event_queue_limit = limit;
        self
    }

    pub fn viewport(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Reject viewports and text sizes that can never be laid out.
    pub fn validate(&self) -> Result<()> {
        self.viewport().validate()?;
        if !self.text_size.is_finite() || self.text_size <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "text size must be positive, got {}",
                self.text_size
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Gui
// ---------------------------------------------------------------------------

/// A widget tree with everything needed to lay it out, feed it input and
/// paint it.
pub struct Gui {
    tree: WidgetTree,
    theme: Theme,
    textures: TextureManager,
    engine: LayoutEngine,
    hits: SpatialMap,
    dispatcher: EventDispatcher,
    signals: Signals,
    painter: Painter,
    config: GuiConfig,
    viewport: Size,
}

impl Gui {
    /// Create a GUI whose textures are loaded through `loader`.
    ///
    /// Loads `config.theme_path` if set, the built-in theme otherwise.
    pub fn new(config: GuiConfig, loader: impl TextureLoader + 'static) -> Result<Self> {
        Self::with_texture_manager(config, TextureManager::new(loader))
    }

    /// Create a GUI sharing an existing texture cache.
    pub fn with_texture_manager(config: GuiConfig, textures: TextureManager) -> Result<Self> {
        config.validate()?;
        let theme = match &config.theme_path {
            Some(path) => Theme::load_file(path)?,
            None => Theme::builtin(),
        };
        let mut tree = WidgetTree::new();
        tree.set_notifications(true);
        Ok(Self {
            tree,
            theme,
            textures,
            engine: LayoutEngine::new(),
            hits: SpatialMap::new(),
            dispatcher: EventDispatcher::new(),
            signals: Signals::new().with_queue_limit(config.event_queue_limit),
            painter: Painter::new().with_text_size(config.text_size),
            viewport: config.viewport(),
            config,
        })
    }

    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// Mutable access to the tree. Notifications queued by tree operations
    /// are delivered on the next [`poll_events`](Self::poll_events) or
    /// [`handle_event`](Self::handle_event).
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    pub fn root(&self) -> WidgetId {
        self.tree.root()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn textures(&self) -> &TextureManager {
        &self.textures
    }

    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    // -- widgets -------------------------------------------------------------

    /// Create a widget under `parent`, styled from the theme unless it
    /// carries its own renderer.
    pub fn add(&mut self, parent: WidgetId, widget: Widget) -> Result<WidgetId> {
        let widget = self.themed(widget);
        self.tree.insert(parent, widget)
    }

    /// Create a detached widget, styled like [`add`](Self::add).
    pub fn create(&mut self, widget: Widget) -> Result<WidgetId> {
        let widget = self.themed(widget);
        self.tree.create(widget)
    }

    /// Destroy a widget and its subtree, dropping their callbacks.
    pub fn destroy(&mut self, id: WidgetId) -> Result<()> {
        self.tree.destroy(id)?;
        self.flush();
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<WidgetId> {
        self.tree.find(name)
    }

    fn themed(&self, mut widget: Widget) -> Widget {
        if !widget.custom_renderer {
            if let Some(renderer) = self.theme.get(widget.kind.type_name()) {
                widget.renderer = renderer.clone();
            }
        }
        widget
    }

    // -- theme ---------------------------------------------------------------

    /// Switch themes. Every widget without a custom renderer is re-bound to
    /// the new theme's section for its kind; widgets whose kind has no
    /// section keep their renderer.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        let themed: Vec<WidgetId> = self
            .tree
            .nodes
            .iter()
            .filter(|(_, w)| !w.custom_renderer)
            .map(|(id, _)| id)
            .collect();
        let mut rebound = 0;
        for id in themed {
            let section = self.tree.widget(id)?.kind.type_name();
            if let Some(renderer) = theme.get(section) {
                self.tree.apply_theme_renderer(id, renderer.clone())?;
                rebound += 1;
            }
        }
        debug!(rebound, sections = theme.len(), "theme applied");
        self.theme = theme;
        self.flush();
        Ok(())
    }

    /// Load a theme file and switch to it.
    pub fn load_theme(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let theme = Theme::load_file(path)?;
        self.set_theme(theme)
    }

    // -- textures ------------------------------------------------------------

    /// Acquire every texture referenced by attached widgets that is not
    /// resolved yet. Returns how many were acquired.
    ///
    /// With `placeholder_fallback`, missing images resolve to the placeholder;
    /// otherwise the first missing image fails the call.
    pub async fn prepare_textures(&mut self) -> Result<usize> {
        let pending = self.tree.pending_textures();
        let count = pending.len();
        for (id, property, reference) in pending {
            let key = self.texture_key(&reference);
            let texture = if self.config.placeholder_fallback {
                self.textures.acquire_or_placeholder(key).await?
            } else {
                self.textures.acquire(key).await?
            };
            if texture.is_placeholder() {
                warn!(?id, %property, texture = %reference.id, "widget uses placeholder texture");
            }
            self.tree.store_texture(id, property, reference, texture)?;
        }
        if count > 0 {
            debug!(count, cached = self.textures.cached_count(), "textures prepared");
        }
        Ok(count)
    }

    fn texture_key(&self, reference: &TextureRef) -> TextureKey {
        let mut key = reference.key();
        if let Some(base) = &self.config.resource_path {
            if !reference.resolved && Path::new(&key.id).is_relative() {
                key.id = base.join(&key.id).to_string_lossy().into_owned();
            }
        }
        key
    }

    // -- layout --------------------------------------------------------------

    /// Recompute bounds and the hit map.
    pub fn layout(&mut self) -> Result<()> {
        self.engine.compute(&mut self.tree, self.viewport, &mut self.hits)
    }

    fn ensure_layout(&mut self) -> Result<()> {
        if self.tree.needs_layout() {
            self.layout()?;
        }
        Ok(())
    }

    /// Change the viewport size and lay out again.
    pub fn resize(&mut self, size: Size) -> Result<()> {
        size.validate()?;
        self.viewport = size;
        self.layout()
    }

    /// The widget that would receive a click at `point`.
    pub fn widget_at(&mut self, point: Offset) -> Result<Option<WidgetId>> {
        self.ensure_layout()?;
        Ok(self.hits.widget_at(point))
    }

    // -- input ---------------------------------------------------------------

    /// Feed one input event. Returns whether a widget consumed it.
    pub fn handle_event(&mut self, event: impl Into<InputEvent>) -> Result<bool> {
        let event = event.into();
        self.flush();
        if let InputEvent::Resize(size) = event {
            self.resize(size)?;
            return Ok(false);
        }
        self.ensure_layout()?;
        let handled = self
            .dispatcher
            .dispatch(&mut self.tree, &self.hits, &event, &mut self.signals);
        self.flush();
        Ok(handled)
    }

    /// Give keyboard focus to a widget. Returns `false` if it cannot take it.
    pub fn focus(&mut self, id: WidgetId) -> Result<bool> {
        self.flush();
        self.dispatcher.focus(&mut self.tree, id, &mut self.signals)
    }

    pub fn unfocus(&mut self) {
        self.flush();
        self.dispatcher.unfocus(&mut self.tree, &mut self.signals);
    }

    pub fn focused(&self) -> Option<WidgetId> {
        self.dispatcher.focused()
    }

    // -- signals -------------------------------------------------------------

    /// Call `callback` whenever `widget` emits an event of `kind`.
    pub fn connect(
        &mut self,
        widget: WidgetId,
        kind: SignalKind,
        callback: impl FnMut(&WidgetEvent) + 'static,
    ) -> ConnectionId {
        self.signals.connect(widget, kind, callback)
    }

    pub fn disconnect(&mut self, connection: ConnectionId) -> bool {
        self.signals.disconnect(connection)
    }

    /// Deliver pending notifications and take every queued event.
    pub fn poll_events(&mut self) -> Vec<WidgetEvent> {
        self.flush();
        self.signals.drain()
    }

    /// Turn queued tree notifications into signals.
    fn flush(&mut self) {
        for event in self.tree.drain_lifecycle() {
            match event {
                LifecycleEvent::Attached { .. } => {}
                LifecycleEvent::Detached { id } => self.dispatcher.forget(id),
                LifecycleEvent::Destroyed { id } => {
                    self.dispatcher.forget(id);
                    self.signals.disconnect_widget(id);
                }
            }
        }
        for change in self.tree.drain_renderer_changes() {
            self.signals.emit(WidgetEvent::RendererChanged {
                id: change.id,
                property: change.property,
            });
        }
    }

    // -- paint ---------------------------------------------------------------

    /// Paint the tree, laying it out first if needed.
    ///
    /// Fails with [`Error::TextureNotReady`] if a texture property has not
    /// been prepared.
    pub fn paint(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        self.ensure_layout()?;
        self.painter.paint(&self.tree, target)
    }
}

impl std::fmt::Debug for Gui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gui")
            .field("widgets", &self.tree.len())
            .field("viewport", &self.viewport)
            .field("textures", &self.textures)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::input::Key;
    use crate::render::recorder::{DrawCommand, Recorder};
    use crate::renderer::{Color, RendererData, Renderer};
    use crate::texture::{ImageData, LoadError, MemoryLoader, PLACEHOLDER_ID};
    use std::cell::Cell;
    use std::rc::Rc;

    fn loader() -> MemoryLoader {
        MemoryLoader::new().with_image("cat.png", ImageData::solid(4, 4, [1, 2, 3, 255]))
    }

    fn gui() -> Gui {
        Gui::new(GuiConfig::new().with_viewport(200.0, 100.0), loader()).unwrap()
    }

    #[test]
    fn config_defaults_and_builder() {
        let config = GuiConfig::new()
            .with_viewport(320.0, 240.0)
            .with_text_size(11.0)
            .with_placeholder_fallback(false)
            .with_resource_path("assets");
        assert_eq!(config.viewport(), Size::new(320.0, 240.0));
        assert_eq!(config.text_size, 11.0);
        assert!(!config.placeholder_fallback);
        assert_eq!(config.resource_path, Some(PathBuf::from("assets")));
        assert!(GuiConfig::default().placeholder_fallback);
    }

    #[test]
    fn config_from_toml() {
        let config = GuiConfig::from_toml_str(
            r#"
            width = 1024
            height = 768.5
            resource_path = "res"
            placeholder_fallback = false
            event_queue_limit = 16
            "#,
        )
        .unwrap();
        assert_eq!(config.viewport(), Size::new(1024.0, 768.5));
        assert_eq!(config.resource_path, Some(PathBuf::from("res")));
        assert_eq!(config.text_size, DEFAULT_TEXT_SIZE);
        assert!(!config.placeholder_fallback);
        assert_eq!(config.event_queue_limit, 16);
        assert_eq!(GuiConfig::new().event_queue_limit, DEFAULT_QUEUE_LIMIT);
    }

    #[test]
    fn unpolled_hover_events_stay_bounded() {
        let mut gui = Gui::new(
            GuiConfig::new().with_viewport(200.0, 100.0).with_event_queue_limit(8),
            loader(),
        )
        .unwrap();
        let root = gui.root();
        let button = gui.add(root, Widget::button("go").sized((50.0, 20.0))).unwrap();
        let entered = Rc::new(Cell::new(0));
        let counter = Rc::clone(&entered);
        gui.connect(button, SignalKind::MouseEntered, move |_| counter.set(counter.get() + 1));

        for _ in 0..5000 {
            gui.handle_event(InputEvent::mouse_move(10.0, 10.0)).unwrap();
            gui.handle_event(InputEvent::mouse_move(150.0, 10.0)).unwrap();
        }
        assert_eq!(entered.get(), 5000);
        assert_eq!(gui.signals().pending_count(), 8);
        assert_eq!(gui.poll_events().len(), 8);
    }

    #[test]
    fn config_rejects_bad_values() {
        assert!(matches!(GuiConfig::from_toml_str("colour = 1"), Err(Error::Config(_))));
        assert!(matches!(
            GuiConfig::from_toml_str("width = -5"),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(matches!(
            GuiConfig::new().with_text_size(0.0).validate(),
            Err(Error::InvalidGeometry(_))
        ));
        assert!(matches!(
            GuiConfig::from_file("/no/such/trellis.toml"),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn add_applies_theme_renderer() {
        let mut gui = gui();
        let root = gui.root();
        let a = gui.add(root, Widget::button("a")).unwrap();
        let b = gui.add(root, Widget::button("b")).unwrap();
        let custom = gui
            .add(root, Widget::button("c").with_renderer(Renderer::default()))
            .unwrap();
        let theme_button = gui.theme().renderer("Button").unwrap();
        let tree = gui.tree();
        assert!(tree.widget(a).unwrap().renderer().ptr_eq(&theme_button));
        assert!(tree.widget(a).unwrap().renderer().ptr_eq(tree.widget(b).unwrap().renderer()));
        assert!(!tree.widget(custom).unwrap().renderer().ptr_eq(&theme_button));
    }

    #[test]
    fn set_theme_rebinds_themed_widgets_and_reports_changes() {
        let mut gui = gui();
        let root = gui.root();
        let themed = gui.add(root, Widget::button("a")).unwrap();
        let custom = gui
            .add(root, Widget::button("b").with_renderer(Renderer::default()))
            .unwrap();
        gui.poll_events();

        let theme = Theme::parse("Button { TextColor = red; }").unwrap();
        gui.set_theme(theme).unwrap();

        assert_eq!(
            gui.tree().widget(themed).unwrap().renderer().data().color("TextColor"),
            Some(Color::RED)
        );
        let events = gui.poll_events();
        assert!(events.contains(&WidgetEvent::RendererChanged {
            id: themed,
            property: "TextColor".into()
        }));
        assert!(events.iter().all(|e| e.id() != custom));
    }

    #[tokio::test]
    async fn prepare_textures_resolves_and_shares() {
        let mut gui = gui();
        let root = gui.root();
        let a = gui
            .add(root, Widget::picture(TextureRef::new("cat.png")).sized((10.0, 10.0)))
            .unwrap();
        let b = gui
            .add(root, Widget::picture(TextureRef::new("cat.png")).at((20.0, 0.0)).sized((10.0, 10.0)))
            .unwrap();

        assert!(matches!(gui.paint(&mut Recorder::new()), Err(Error::TextureNotReady(_))));
        assert_eq!(gui.prepare_textures().await.unwrap(), 2);
        assert_eq!(gui.prepare_textures().await.unwrap(), 0);

        let key = TextureKey::new("cat.png");
        assert_eq!(gui.textures().users(&key), 2);
        let ta = gui.tree().widget(a).unwrap().texture("Texture").unwrap();
        let tb = gui.tree().widget(b).unwrap().texture("Texture").unwrap();
        assert!(ta.ptr_eq(tb));

        let mut rec = Recorder::new();
        gui.paint(&mut rec).unwrap();
        let textures = rec
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Texture { .. }))
            .count();
        assert_eq!(textures, 2);

        gui.destroy(a).unwrap();
        assert_eq!(gui.textures().users(&key), 1);
        gui.destroy(b).unwrap();
        assert!(!gui.textures().contains(&key));
    }

    #[tokio::test]
    async fn missing_texture_uses_placeholder_or_fails() {
        let mut gui = gui();
        let root = gui.root();
        let pic = gui
            .add(root, Widget::picture(TextureRef::new("dog.png")).sized((10.0, 10.0)))
            .unwrap();
        gui.prepare_textures().await.unwrap();
        let texture = gui.tree().widget(pic).unwrap().texture("Texture").unwrap();
        assert!(texture.is_placeholder());
        assert_eq!(texture.key().id, PLACEHOLDER_ID);

        let mut strict = Gui::new(GuiConfig::new().with_placeholder_fallback(false), loader()).unwrap();
        let root = strict.root();
        strict
            .add(root, Widget::picture(TextureRef::new("dog.png")))
            .unwrap();
        assert!(matches!(
            strict.prepare_textures().await,
            Err(Error::ResourceNotFound { ref id, .. }) if id == "dog.png"
        ));
    }

    #[tokio::test]
    async fn resource_path_prefixes_relative_ids() {
        let loader = MemoryLoader::new().with_image(
            Path::new("assets").join("cat.png").to_string_lossy(),
            ImageData::solid(2, 2, [0, 0, 0, 255]),
        );
        let config = GuiConfig::new()
            .with_resource_path("assets")
            .with_placeholder_fallback(false);
        let mut gui = Gui::new(config, loader).unwrap();
        let root = gui.root();
        let pic = gui.add(root, Widget::picture(TextureRef::new("cat.png"))).unwrap();
        gui.prepare_textures().await.unwrap();
        assert!(!gui.tree().widget(pic).unwrap().texture("Texture").unwrap().is_placeholder());
    }

    #[tokio::test]
    async fn theme_textures_are_not_prefixed_twice() {
        let base = std::env::temp_dir().join(format!("trellis-gui-theme-{}", std::process::id()));
        let assets = base.join("assets");
        std::fs::create_dir_all(&assets).unwrap();
        let theme_path = assets.join("black.theme");
        std::fs::write(&theme_path, r#"Panel { TextureBackground = "pic.png"; }"#).unwrap();

        let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
        let log = std::sync::Arc::clone(&seen);
        let loader = move |id: &str| -> std::result::Result<ImageData, LoadError> {
            log.lock().push(id.to_owned());
            Ok(ImageData::solid(2, 2, [0, 0, 0, 255]))
        };
        let config = GuiConfig::new()
            .with_resource_path(&assets)
            .with_theme_path(&theme_path)
            .with_placeholder_fallback(false);
        let mut gui = Gui::new(config, loader).unwrap();
        let root = gui.root();
        gui.add(root, Widget::panel().sized((10.0, 10.0))).unwrap();
        gui.add(root, Widget::picture(TextureRef::new("own.png"))).unwrap();
        gui.prepare_textures().await.unwrap();

        let mut seen = seen.lock().clone();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                assets.join("own.png").to_string_lossy().into_owned(),
                assets.join("pic.png").to_string_lossy().into_owned(),
            ]
        );
        std::fs::remove_dir_all(&base).ok();
    }

    #[tokio::test]
    async fn changed_texture_property_needs_new_prepare() {
        let mut gui = gui();
        let root = gui.root();
        let panel = gui.add(root, Widget::panel().sized((10.0, 10.0))).unwrap();
        gui.tree_mut()
            .set_property(panel, "TextureBackground", TextureRef::new("cat.png"))
            .unwrap();
        gui.prepare_textures().await.unwrap();
        gui.paint(&mut Recorder::new()).unwrap();

        gui.tree_mut()
            .set_property(panel, "TextureBackground", TextureRef::new("cat.png").smooth(false))
            .unwrap();
        assert!(matches!(gui.paint(&mut Recorder::new()), Err(Error::TextureNotReady(_))));
        assert_eq!(gui.prepare_textures().await.unwrap(), 1);
        assert!(!gui.textures().contains(&TextureKey::new("cat.png")));
        assert!(gui.textures().contains(&TextureKey::new("cat.png").smooth(false)));
    }

    #[test]
    fn click_emits_pressed_through_callback() {
        let mut gui = gui();
        let root = gui.root();
        let button = gui.add(root, Widget::button("go").sized((50.0, 20.0))).unwrap();
        let presses = Rc::new(Cell::new(0));
        let counter = Rc::clone(&presses);
        gui.connect(button, SignalKind::Pressed, move |_| counter.set(counter.get() + 1));

        assert_eq!(gui.widget_at(Offset::new(10.0, 10.0)).unwrap(), Some(button));
        gui.handle_event(InputEvent::mouse_down(10.0, 10.0)).unwrap();
        gui.handle_event(InputEvent::mouse_up(10.0, 10.0)).unwrap();
        assert_eq!(presses.get(), 1);
        assert_eq!(gui.focused(), Some(button));

        gui.handle_event(InputEvent::key(Key::Enter)).unwrap();
        assert_eq!(presses.get(), 2);
    }

    #[test]
    fn destroy_forgets_focus_and_callbacks() {
        let mut gui = gui();
        let root = gui.root();
        let button = gui.add(root, Widget::button("go").sized((50.0, 20.0))).unwrap();
        gui.connect(button, SignalKind::Pressed, |_| {});
        assert!(gui.focus(button).unwrap());
        gui.destroy(button).unwrap();
        assert_eq!(gui.focused(), None);
        assert_eq!(gui.signals().connection_count(), 0);
    }

    #[test]
    fn resize_relayouts() {
        let mut gui = gui();
        let root = gui.root();
        let label = gui
            .add(root, Widget::label("x").sized(crate::layout::Layout2d::percent(50.0, 50.0)))
            .unwrap();
        gui.layout().unwrap();
        assert_eq!(gui.tree().widget(label).unwrap().bounds().width, 100.0);
        gui.handle_event(InputEvent::Resize(Size::new(400.0, 100.0))).unwrap();
        assert_eq!(gui.viewport(), Size::new(400.0, 100.0));
        assert_eq!(gui.tree().widget(label).unwrap().bounds().width, 200.0);
        assert!(gui.resize(Size::new(f32::NAN, 1.0)).is_err());
    }

    #[test]
    fn shared_property_notifies_every_holder() {
        let mut gui = gui();
        let root = gui.root();
        let shared = Renderer::new(RendererData::new());
        let a = gui.add(root, Widget::label("a").with_renderer(shared.clone())).unwrap();
        let b = gui.add(root, Widget::label("b").with_renderer(shared)).unwrap();
        gui.poll_events();
        assert_eq!(gui.tree_mut().set_shared_property(a, "TextColor", Color::BLUE).unwrap(), 2);
        let ids: Vec<WidgetId> = gui.poll_events().iter().map(WidgetEvent::id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&a) && ids.contains(&b));
    }
}
