/// Template written by `retext --init`.
pub fn generate_init_template() -> String {
	r##"# retext configuration
#
# Rules run in order; each one replaces every match in a single pass.
# Files are only rewritten when their content actually changes.

# Start from a built-in rule set (see `retext presets`).
# preset = "api-url"

# Default targets, relative to this file.
paths = ["src"]

# Only these extensions are picked up when walking directories.
extensions = ["ts", "tsx"]
recursive = true

# A bare string is matched literally and replaced verbatim.
[[rules]]
pattern = "`http://localhost:3001/api"
replacement = "`${config.apiUrl}"

# Regex replacements expand $1 / ${1}; write $$ for a literal `$`.
[[rules]]
pattern = { regex = "'http://localhost:3001/api([^'`\\r\\n]*)'" }
replacement = "`$${config.apiUrl}${1}`"

# Sed-style rules are also accepted:
# [[rules]]
# sed = "s#http://localhost:(\\d+)#http://127.0.0.1:$1#"

[import]
line = "import { config } from '@/config'"
trigger = "config.apiUrl"
# presence = "from '@/config'"
line-prefix = "import "
"##
	.to_string()
}
