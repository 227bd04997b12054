//! Mind-map canvas engine.
//!
//! Owns the full lifecycle of a mind-map editing session: translating pointer,
//! keyboard and toolbar input into diagram mutations, maintaining the viewport
//! for pan/zoom, hit-testing nodes and connections, producing a render model,
//! and persisting the working diagram and named saved maps to a key-value
//! store. The host is responsible only for wiring its events to
//! [`editor::MindMapEditor`] and drawing the [`render::SceneView`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | Session wrapper: autosave, named saves, PDF export, notices |
//! | [`engine`] | Testable [`engine::EngineCore`] and the [`engine::Action`]s it emits |
//! | [`toolbar`] | Toolbar state snapshot and command dispatch |
//! | [`doc`] | Diagram (nodes plus connections) and its persisted snapshot |
//! | [`node`] | Node records and the node store |
//! | [`connection`] | Connection records, styles and the connection store |
//! | [`camera`] | Viewport pan/zoom and coordinate conversions |
//! | [`geometry`] | Rectangles, resize handles, segment distance |
//! | [`input`] | Tools, input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against handles, nodes and connection lines |
//! | [`render`] | Render model built from the diagram and UI state |
//! | [`color`] | Hex color parsing and contrasting text color |
//! | [`storage`] | Key-value store trait with memory and file backends |
//! | [`persistence`] | Working-diagram record and the saved-maps collection |
//! | [`autosave`] | Debounced background writer for the working diagram |
//! | [`thumbnail`] | Rasterizer and PDF exporter collaborator traits |
//! | [`config`] | Environment-driven editor configuration |
//! | [`consts`] | Shared constants (zoom limits, default sizes, palette, etc.) |

pub mod autosave;
pub mod camera;
pub mod color;
pub mod config;
pub mod connection;
pub mod consts;
pub mod doc;
pub mod editor;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod node;
pub mod persistence;
pub mod render;
pub mod storage;
pub mod thumbnail;
pub mod toolbar;
