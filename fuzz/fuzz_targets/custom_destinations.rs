#![no_main]

use libfuzzer_sys::fuzz_target;
use jumpscope::{
    config::KnownAppIds,
    decoder::LinkDecoder,
    destinations::custom,
    shell::{NoInstalledApplications, NoShell},
    Enrichment,
};

fuzz_target!(|data: &[u8]| {
    let known = KnownAppIds::default();
    let decoder = LinkDecoder::new(Enrichment::Disabled, &known, &NoShell, &NoInstalledApplications);
    let _ = custom::parse(data, "fuzz.customDestinations-ms", &decoder, 10);
});
