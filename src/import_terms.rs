// 批量导入工具 - 从 JSON 数组文件导入词条
use anyhow::Result;
use std::path::PathBuf;

use fingloss_lib::config::{AppConfig, CONFIG_LOCK};
use fingloss_lib::glossary::{import, GlossaryStore};

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    println!("=== fingloss 词条批量导入工具 ===\n");

    // 1. 获取导入文件路径（参数优先，否则交互输入）
    let import_path = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            println!("请输入导入文件路径 (JSON 数组格式):");
            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            input.trim().to_string()
        }
    };

    if import_path.is_empty() {
        anyhow::bail!("导入文件路径不能为空");
    }

    let import_file = PathBuf::from(&import_path);
    if !import_file.exists() {
        anyhow::bail!("文件不存在: {}", import_path);
    }

    println!("✓ 导入文件: {}\n", import_path);

    // 2. 打开词库（词库路径跟随应用配置）
    let store_path = {
        let _guard = CONFIG_LOCK.lock().unwrap();
        AppConfig::load()?.store_path()?
    };
    let mut store = GlossaryStore::open(&store_path)?;
    println!("✓ 词库: {:?} (现有 {} 个词条)\n", store_path, store.len());

    // 3. 导入并保存
    println!("正在导入...");
    let report = import::import_file(&mut store, &import_file)?;

    println!("✅ 导入完成!");
    println!("  新增: {}", report.imported);
    println!("  更新: {}", report.updated);
    println!("  跳过: {}", report.skipped);
    println!("  词库总数: {}", store.len());

    Ok(())
}
