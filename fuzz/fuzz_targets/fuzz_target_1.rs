#![no_main]

use libfuzzer_sys::fuzz_target;
use login_protocol::protocol::dispatcher::ClientPacketTable;
use login_protocol::PacketReader;

fuzz_target!(|data: &[u8]| {
    // Fuzz inbound decoding - test for panics, crashes, infinite loops
    let _ = ClientPacketTable::with_defaults().decode(data);

    let mut reader = PacketReader::new(data);
    while reader.read_str().is_ok() {}
});
