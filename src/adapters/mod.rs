// Adapters layer: concrete render surfaces for the view ports.
// The console flavors live here; kiosk hardware panels would slot in alongside.

pub mod console;
