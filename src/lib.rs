/*!

An encoder and decoder for [Hollow Knight:
Silksong](https://en.wikipedia.org/wiki/Hollow_Knight:_Silksong) save files
(`user1.dat` and friends), the format written by the game's Unity/C#
runtime.

On disk a save is a layered envelope:

```text
┌──────────────────────────────────────────────────────┐
│ 22 byte C# BinaryFormatter preamble                  │
│ LEB128 payload length                                │
│ base64(AES-256-ECB(PKCS7(JSON)))                     │
│ 0x0B sentinel byte                                   │
└──────────────────────────────────────────────────────┘
```

This library peels those layers off (and puts them back) without
interpreting the JSON document inside: the game's save schema is open and
changes between patches, so the decoded form is a dynamic
[`SaveState`] value rather than a static struct.

## Quick Start

```rust
use silksave::{decode_save, encode_save, SaveState};

# fn main() -> Result<(), Box<dyn std::error::Error>> {
let state: SaveState = serde_json::json!({
    "playerData": { "geo": 500, "health": 5 }
});

let file = encode_save(&state)?;
let roundtrip = decode_save(&file)?;
assert_eq!(state, roundtrip);
# Ok(())
# }
```

Decoding a real file works the same way: read the whole file into memory
and hand the bytes to [`decode_save`]. The caller owns writing the output
of [`encode_save`] back to disk; no I/O happens inside the library.

## One Level Lower

Each pipeline stage is exposed on its own for callers that want to stop
partway — for example to inspect the raw ciphertext, or to re-frame a
payload produced elsewhere:

- [`envelope`] strips and rebuilds the outer binary framing
- [`transport`] converts between the base64 text payload and cipher bytes
- [`cipher`] encrypts and decrypts with the game's fixed AES-256 key

## Caveats

Caller is responsible for:

- Reading the save file fully into memory before decoding
- Preserving a backup of the original file; the encoder produces a valid
  file but cannot verify the document is one the game will accept
- Knowing which field means what — this library treats the decoded
  document as opaque JSON

Every operation is a pure function over in-memory buffers. The only
shared values are compile-time constants, so calls are freely concurrent.

*/

pub mod cipher;
pub mod envelope;
mod errors;
mod save;
pub mod transport;

pub use self::errors::*;
pub use self::save::*;
