//! Patch rules applied when `zint-vendor.toml` declares none.

use super::PatchRule;

/// The default rule set for embedding zint's backend in a host process.
///
/// - `backend/library.c` includes the generated `zintconfig.h` directly, so
///   `ZBarcode_Version()` sees the version macros without a CMake configure
///   step.
/// - Hex dumps requested with `BARCODE_STDOUT` go to `stderr`; the host owns
///   `stdout`.
pub fn builtin_rules() -> Vec<PatchRule> {
    vec![
        PatchRule::new("backend/library.c")
            .literal(
                "#include \"zfiletypes.h\"",
                "#include \"zfiletypes.h\"\n#include \"zintconfig.h\"",
            )
            .literal("f = stdout;", "f = stderr;"),
    ]
}
