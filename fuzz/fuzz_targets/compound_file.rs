#![no_main]

use libfuzzer_sys::fuzz_target;
use jumpscope::cfb::CompoundFile;

fuzz_target!(|data: &[u8]| {
    if let Ok(container) = CompoundFile::from_mem(data.to_vec()) {
        for stream in container.streams() {
            let _ = stream.read();
        }
    }
});
