mod mock_ocr_engine;
mod slow_ocr_engine;

pub use mock_ocr_engine::MockOcrEngine;
#[allow(unused_imports)]
pub use slow_ocr_engine::SlowOcrEngine;
