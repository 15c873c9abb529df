// Domain layer: 模型與 ports，不依賴任何具體後端

pub mod model;
pub mod ports;
