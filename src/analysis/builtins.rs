//! Module names provided by the runtime rather than by npm.

/// Node.js standard library modules.
const NODE_BUILTINS: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "inspector/promises",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Modules injected by the editor host.
const HOST_MODULES: &[&str] = &["vscode"];

const NODE_PREFIX: &str = "node:";

/// Returns true if `specifier` names a runtime-provided module.
///
/// Anything under the `node:` scheme is provided by the runtime, including
/// modules that only exist with the prefix (`node:test`, `node:sqlite`).
pub fn is_builtin(specifier: &str) -> bool {
    specifier.starts_with(NODE_PREFIX)
        || HOST_MODULES.contains(&specifier)
        || NODE_BUILTINS.contains(&specifier)
}
