#![no_main]

use libfuzzer_sys::fuzz_target;
use jumpscope::{shelllink::ShellLink, Parser};

fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::new(data);
    if let Ok(link) = ShellLink::parse(&mut parser) {
        let _ = link.target_path();
        let _ = link.icon_location();
    }
});
