/// Static joint-connection graphs, colors and stroke tables.
pub mod topology;
