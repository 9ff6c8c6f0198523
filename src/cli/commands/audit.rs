//! Audit command - coverage of modelled vs placeholder statements.

use std::path::Path;

use anyhow::Context;

use crate::parsing::lua::LuaFlowAudit;

pub fn run(file_path: &Path) -> anyhow::Result<()> {
    let audit = LuaFlowAudit::audit_file(file_path)
        .with_context(|| format!("Cannot audit {}", file_path.display()))?;
    print!("{}", audit.generate_report());
    Ok(())
}
