use std::collections::BTreeSet;

use super::emit::EmissionBuffer;

/// Lua support functions emitted at the top of a chunk when lowering needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Helper {
    /// Integer division truncating toward zero.
    IntDiv,
    /// Integer remainder with the sign of the dividend.
    IntRem,
    /// Zero-filled array allocation.
    NewArray,
    ParseInt,
}

impl Helper {
    pub fn name(self) -> &'static str {
        match self {
            Helper::IntDiv => "__j2lua_idiv",
            Helper::IntRem => "__j2lua_irem",
            Helper::NewArray => "__j2lua_new_array",
            Helper::ParseInt => "__j2lua_parse_int",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Helper::IntDiv => {
                "local function __j2lua_idiv(a, b)
    if b == 0 then error(\"/ by zero\", 0) end
    local q = a // b
    if q < 0 and q * b ~= a then q = q + 1 end
    return q
end"
            }
            Helper::IntRem => {
                "local function __j2lua_irem(a, b)
    if b == 0 then error(\"/ by zero\", 0) end
    return math.fmod(a, b)
end"
            }
            Helper::NewArray => {
                "local function __j2lua_new_array(n, init)
    if n < 0 then error(tostring(n), 0) end
    local t = {}
    for i = 1, n do t[i] = init end
    return t
end"
            }
            Helper::ParseInt => {
                "local function __j2lua_parse_int(s)
    local n = string.match(s, \"^[+-]?%d+$\") and math.tointeger(tonumber(s))
    if n == nil or n < -2147483648 or n > 2147483647 then
        error('For input string: \"' .. s .. '\"', 0)
    end
    return n
end"
            }
        }
    }
}

/// The set of helpers a chunk uses. Iteration order is fixed so output is
/// deterministic.
#[derive(Debug, Default)]
pub struct RuntimeRegistry {
    used: BTreeSet<Helper>,
}

impl RuntimeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `helper` as used and returns the name to call it by.
    pub fn require(&mut self, helper: Helper) -> &'static str {
        self.used.insert(helper);
        helper.name()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// Writes the used helpers' definitions, separated by blank lines.
    pub fn emit_prelude(&self, buf: &mut EmissionBuffer) {
        for (i, helper) in self.used.iter().enumerate() {
            if i > 0 {
                buf.blank_line();
            }
            buf.lines(helper.source());
        }
        tracing::trace!(helpers = ?self.used, "emitted runtime prelude");
    }
}
