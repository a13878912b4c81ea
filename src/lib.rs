//! Editor core for the asset XML documents handled by `ragemap-files`:
//! the MLO interior editing model, the scene adapter contract, and the
//! document I/O front door.

pub mod io;
pub mod mlo;
pub mod scene;
