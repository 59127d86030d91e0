//! Geometry and document layer for the coupon designer.
//!
//! This crate owns everything about a coupon design that can be computed
//! without I/O: the canvas element model, the shared style state, the
//! magnetic snap engine used during drag, the equal-spacing alignment-guide
//! detector, and the read-path renderer that maps a document to absolutely
//! positioned visual nodes. The server crate holds live documents in memory
//! and persists them; this crate never touches the network or the database.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`element`] | Canvas element tagged union and bounding-box geometry |
//! | [`design`] | Design state, document container, and sparse updates |
//! | [`snap`] | Magnetic snapping of a dragged element to guide coordinates |
//! | [`align`] | Equal-spacing alignment-guide detection |
//! | [`render`] | Read-path renderer shared by editor preview and export |
//! | [`consts`] | Shared numeric constants (snap radius, tolerances, etc.) |

pub mod align;
pub mod consts;
pub mod design;
pub mod element;
pub mod render;
pub mod snap;
