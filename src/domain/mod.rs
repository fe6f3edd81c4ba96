// Domain layer: core models, the sheet template, the ledger value and ports (interfaces).

pub mod ledger;
pub mod model;
pub mod ports;
pub mod template;
