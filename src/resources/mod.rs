// Network resource accumulation
//
// A resource's details arrive piecemeal: request metadata, response
// headers, lengths and timings come from different update fragments and
// timeline records. The store keeps one merged snapshot per identifier so
// rules always see the "resource so far", and forgets it once the
// resource completes.

mod state;
mod store;
mod update;

pub use state::ResourceState;
pub use store::{ResourceStore, UpdateOutcome};
pub use update::ResourceUpdate;

#[cfg(test)]
mod tests;
