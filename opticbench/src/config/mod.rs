mod sensor_desc;
mod table_desc;

pub use sensor_desc::SensorDesc;
pub use table_desc::{LightTableDesc, PropagationMode};
