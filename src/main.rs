// 词汇表应用主程序
//
// 交互式 REPL：列表 / 详情 / 导入三个视图由显式状态机驱动。
// 发音练习以手动键入的转写充当语音识别协作方（终端没有麦克风识别，
// 转写来源本就是可替换的外部协作方）。

use anyhow::Result;
use std::io::Write;

use fingloss_lib::app_state::{reduce, Action, AppState, View};
use fingloss_lib::config::{AppConfig, CONFIG_LOCK};
use fingloss_lib::glossary::{import, search, GlossaryStore, Term, TermFields, TermPatch};
use fingloss_lib::practice::{LoggingSink, PracticeSession, SessionStats, TranscriptSource};
use fingloss_lib::tts::{play_mp3, ElevenLabsClient};

/// 从标准输入读取转写，空行表示本次没有识别到内容
struct StdinTranscriptSource;

impl TranscriptSource for StdinTranscriptSource {
    fn next_transcript(&mut self) -> Result<Option<String>> {
        print!("🎤 > ");
        std::io::stdout().flush()?;
        let line = read_line()?;
        let line = line.trim().to_string();
        Ok((!line.is_empty()).then_some(line))
    }
}

fn read_line() -> Result<String> {
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input)
}

fn prompt(text: &str) -> Result<String> {
    print!("{}", text);
    std::io::stdout().flush()?;
    Ok(read_line()?.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = {
        let _guard = CONFIG_LOCK.lock().unwrap();
        AppConfig::load()?
    };
    let store_path = config.store_path()?;
    let mut store = GlossaryStore::open(store_path)?;
    tracing::info!("词库就绪: {} 个词条", store.len());

    let mut state = AppState::default();

    println!("fingloss - personal vocabulary glossary");
    println!("Type 'help' for commands.");

    loop {
        let input = match state.view {
            View::List => prompt("\nglossary> ")?,
            View::Detail(_) => prompt("\nterm> ")?,
            View::Import => prompt("\nimport> ")?,
        };
        let (command, rest) = split_command(&input);

        if command == "quit" || command == "exit" {
            break;
        }
        if command == "help" {
            print_help(&state.view);
            continue;
        }

        state = match state.view {
            View::List => handle_list(state, command, rest, &mut store)?,
            View::Detail(id) => handle_detail(state, id, command, rest, &mut store, &config).await?,
            View::Import => handle_import(state, &input, &mut store)?,
        };
    }

    Ok(())
}

fn split_command(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (input, ""),
    }
}

fn print_help(view: &View) {
    match view {
        View::List => {
            println!("  ls              list terms (respecting search/tag filter)");
            println!("  / <text>        set search text (bare '/' clears)");
            println!("  tag [name]      filter by tag (no name clears)");
            println!("  tags            list all tags");
            println!("  add [name]      create a term and open it");
            println!("  open <n>        open the n-th listed term");
            println!("  import          bulk import from a JSON file");
            println!("  quit            exit");
        }
        View::Detail(_) => {
            println!("  show            show the term");
            println!("  term <text>     rename the term");
            println!("  def <text>      set definition");
            println!("  ipa <text>      set IPA pronunciation");
            println!("  zh <text>       set Mandarin translation");
            println!("  tag+ <name>     add a tag");
            println!("  tag- <name>     remove a tag");
            println!("  say             speak the term (ElevenLabs)");
            println!("  practice        practice pronunciation");
            println!("  del             delete the term");
            println!("  back            return to the list");
        }
        View::Import => {
            println!("  <path>          import terms from a JSON array file");
            println!("  back            return to the list");
        }
    }
}

// ============================================================================
// 列表视图
// ============================================================================

fn handle_list(
    state: AppState,
    command: &str,
    rest: &str,
    store: &mut GlossaryStore,
) -> Result<AppState> {
    // "/algo" 与 "/ algo" 均接受；单独 "/" 清空检索
    if let Some(stripped) = command.strip_prefix('/') {
        let text = if stripped.is_empty() {
            rest.to_string()
        } else if rest.is_empty() {
            stripped.to_string()
        } else {
            format!("{} {}", stripped, rest)
        };
        let state = reduce(state, Action::SearchChanged(text));
        print_list(store, &state);
        return Ok(state);
    }

    match command {
        "" | "ls" => {
            print_list(store, &state);
            Ok(state)
        }
        "tag" => {
            let tag = (!rest.is_empty()).then(|| rest.to_string());
            let state = reduce(state, Action::TagSelected(tag));
            print_list(store, &state);
            Ok(state)
        }
        "tags" => {
            let tags = store.all_tags();
            if tags.is_empty() {
                println!("No tags yet");
            } else {
                println!("{}", tags.join(", "));
            }
            Ok(state)
        }
        "add" => {
            let term = store.add_term(TermFields {
                term: rest.to_string(),
                ..Default::default()
            });
            let id = term.id;
            println!("Added \"{}\"", term.term);
            store.save()?;
            // 新建后直接进入详情，清空检索
            let state = reduce(state, Action::SearchChanged(String::new()));
            Ok(reduce(state, Action::TermSelected(id)))
        }
        "open" => {
            let filter = current_filter(&state);
            let listed = search::filter_terms(store.all(), &filter);
            match rest.parse::<usize>().ok().and_then(|n| listed.get(n.wrapping_sub(1))) {
                Some(term) => {
                    let id = term.id;
                    Ok(reduce(state, Action::TermSelected(id)))
                }
                None => {
                    println!("No such entry (use 'ls' for numbering)");
                    Ok(state)
                }
            }
        }
        "import" => Ok(reduce(state, Action::ImportOpened)),
        _ => {
            println!("Unknown command '{}' (try 'help')", command);
            Ok(state)
        }
    }
}

fn current_filter(state: &AppState) -> search::TermFilter {
    search::TermFilter {
        search: state.search.clone(),
        tag: state.selected_tag.clone(),
    }
}

fn print_list(store: &GlossaryStore, state: &AppState) {
    let filter = current_filter(state);
    let listed = search::filter_terms(store.all(), &filter);

    if !state.search.is_empty() || state.selected_tag.is_some() {
        println!(
            "Filter: search={:?} tag={}",
            state.search,
            state.selected_tag.as_deref().unwrap_or("all")
        );
    }

    if listed.is_empty() {
        if state.search.is_empty() {
            println!("No terms yet (use 'add')");
        } else {
            println!("No matches (use 'add {}' to create)", state.search);
            let suggestions = search::suggest(store.all(), &state.search, 3);
            if !suggestions.is_empty() {
                let names: Vec<&str> = suggestions.iter().map(|t| t.term.as_str()).collect();
                println!("Did you mean: {}?", names.join(", "));
            }
        }
        return;
    }

    for (idx, term) in listed.iter().enumerate() {
        let name = if term.term.is_empty() {
            "Untitled"
        } else {
            term.term.as_str()
        };
        let tags = if term.tags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", term.tags.join(", "))
        };
        println!("{:>3}. {}{}", idx + 1, name, tags);
    }
}

// ============================================================================
// 详情视图
// ============================================================================

async fn handle_detail(
    state: AppState,
    id: uuid::Uuid,
    command: &str,
    rest: &str,
    store: &mut GlossaryStore,
    config: &AppConfig,
) -> Result<AppState> {
    // 词条可能已被删除（防御外部修改后的过期 id）
    if store.get(id).is_none() {
        println!("Term no longer exists");
        return Ok(reduce(state, Action::Back));
    }

    match command {
        "" | "show" => {
            if let Some(term) = store.get(id) {
                show_term(term);
            }
            Ok(state)
        }
        "term" | "def" | "ipa" | "zh" => {
            let patch = match command {
                "term" => TermPatch {
                    term: Some(rest.to_string()),
                    ..Default::default()
                },
                "def" => TermPatch {
                    definition: Some(rest.to_string()),
                    ..Default::default()
                },
                "ipa" => TermPatch {
                    ipa: Some(rest.to_string()),
                    ..Default::default()
                },
                _ => TermPatch {
                    mandarin: Some(rest.to_string()),
                    ..Default::default()
                },
            };
            store.update_term(id, patch)?;
            store.save()?;
            println!("Saved");
            Ok(state)
        }
        "tag+" => {
            if let Some(term) = store.get_mut(id) {
                if term.add_tag(rest) {
                    store.save()?;
                    println!("Tag added");
                } else {
                    println!("Tag already present (or empty)");
                }
            }
            Ok(state)
        }
        "tag-" => {
            if let Some(term) = store.get_mut(id) {
                if term.remove_tag(rest) {
                    store.save()?;
                    println!("Tag removed");
                } else {
                    println!("No such tag");
                }
            }
            Ok(state)
        }
        "say" => {
            if let Some(text) = store.get(id).map(|t| t.term.clone()) {
                speak_term(&text, config).await;
            }
            Ok(state)
        }
        "practice" => {
            if let Some(target) = store.get(id).map(|t| t.term.clone()) {
                run_practice(&target, config)?;
            }
            Ok(state)
        }
        "del" => {
            let confirm = prompt("Delete this term? (y/N) ")?;
            if confirm.eq_ignore_ascii_case("y") {
                store.delete_term(id)?;
                store.save()?;
                println!("Deleted");
                Ok(reduce(state, Action::TermDeleted(id)))
            } else {
                Ok(state)
            }
        }
        "back" => Ok(reduce(state, Action::Back)),
        _ => {
            println!("Unknown command '{}' (try 'help')", command);
            Ok(state)
        }
    }
}

fn show_term(term: &Term) {
    let name = if term.term.is_empty() {
        "Untitled"
    } else {
        term.term.as_str()
    };
    println!("Term:       {}", name);
    if !term.ipa.is_empty() {
        println!("IPA:        {}", term.ipa);
    }
    if !term.mandarin.is_empty() {
        println!("Mandarin:   {}", term.mandarin);
    }
    if !term.definition.is_empty() {
        println!("Definition: {}", term.definition);
    }
    if !term.tags.is_empty() {
        println!("Tags:       {}", term.tags.join(", "));
    }
}

async fn speak_term(text: &str, config: &AppConfig) {
    if text.is_empty() {
        println!("Nothing to speak - the term has no name yet");
        return;
    }
    if !config.tts.is_configured() {
        println!("Set the ElevenLabs API key in the config to enable speech");
        return;
    }

    let client = ElevenLabsClient::new(config.tts.clone());
    match client.synthesize(text).await {
        Ok(audio) => {
            if let Err(e) = play_mp3(audio) {
                tracing::error!("音频播放失败: {}", e);
                println!("Audio playback failed: {}", e);
            }
        }
        Err(e) => {
            tracing::error!("TTS 合成失败: {}", e);
            println!("Speech synthesis failed: {}", e);
        }
    }
}

/// 发音练习循环：逐次键入转写，空行结束，最后输出统计
fn run_practice(target: &str, config: &AppConfig) -> Result<()> {
    if target.is_empty() {
        println!("The term has no name yet - nothing to practice");
        return Ok(());
    }

    println!(
        "Practicing \"{}\" ({}). Type what the recognizer heard; empty line stops.",
        target, config.recognition_language
    );

    let session = PracticeSession::new(target).with_threshold(config.pass_threshold);
    let mut source = StdinTranscriptSource;
    let mut logging = LoggingSink;
    let mut stats = SessionStats::default();

    loop {
        let feedback = session.attempt(&mut source, &mut [&mut logging, &mut stats])?;
        let Some(feedback) = feedback else {
            break;
        };

        let badge = if feedback.passed { "✓" } else { "✗" };
        println!("{} {}%  {}", badge, feedback.result.score, feedback.message);
        if let Some(variant) = &feedback.result.matched_variant {
            println!("  (accepted variant: \"{}\")", variant);
        }
    }

    if stats.attempts > 0 {
        println!(
            "Session: {} attempts, {} passed, best {}%",
            stats.attempts, stats.passed, stats.best_score
        );
    }
    Ok(())
}

// ============================================================================
// 导入视图
// ============================================================================

fn handle_import(state: AppState, input: &str, store: &mut GlossaryStore) -> Result<AppState> {
    if input.is_empty() {
        println!("Enter the path of a JSON array file, or 'back'");
        return Ok(state);
    }
    if input == "back" {
        return Ok(reduce(state, Action::Back));
    }

    let path = std::path::PathBuf::from(input);
    match import::import_file(store, &path) {
        Ok(report) => {
            println!(
                "Imported {} new, updated {}, skipped {}",
                report.imported, report.updated, report.skipped
            );
            Ok(reduce(state, Action::Back))
        }
        Err(e) => {
            println!("Import failed: {}", e);
            Ok(state)
        }
    }
}
