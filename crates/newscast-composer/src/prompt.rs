//! Prompt construction for a spoken briefing of a given length.

use newscast_core::{truncate_chars, Article, CompositionBrief, Tone};

/// Articles beyond this are left out of the prompt.
const MAX_PROMPT_ARTICLES: usize = 15;
/// Excerpt length per article, in characters.
const EXCERPT_CHARS: usize = 600;

pub const CLOSING_LINE: &str = "That concludes your briefing. Stay informed and have a great day.";

/// System and user messages for one composition call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// `morning` (05-11), `afternoon` (12-16), `evening` otherwise.
#[must_use]
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "morning",
        12..=16 => "afternoon",
        _ => "evening",
    }
}

fn tone_guidance(tone: Tone) -> &'static str {
    match tone {
        Tone::Professional => "measured and authoritative, like a public radio news anchor",
        Tone::Conversational => "warm and relaxed, as if talking to a friend over coffee",
        Tone::Analytical => "explanatory, focused on causes, context, and what comes next",
        Tone::Upbeat => "energetic and positive without trivializing serious stories",
    }
}

/// English name for common language tags; unknown tags pass through.
fn language_name(tag: &str) -> &str {
    let primary = tag.split(['-', '_']).next().unwrap_or(tag);
    match primary.to_ascii_lowercase().as_str() {
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "nl" => "Dutch",
        "pl" => "Polish",
        "ja" => "Japanese",
        "zh" => "Chinese",
        "hi" => "Hindi",
        "ko" => "Korean",
        _ => tag,
    }
}

fn minutes_label(target_words: u32, words_per_minute_hint: u32) -> u32 {
    target_words.div_ceil(words_per_minute_hint.max(1)).max(1)
}

fn article_block(number: usize, article: &Article) -> String {
    let published = article
        .published_at
        .map(|at| format!("Published: {}\n", at.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();
    format!(
        "Article {number} ({}):\nTitle: {}\nSource: {}\n{published}Excerpt: {}\n",
        article.topic,
        article.title,
        article.source,
        truncate_chars(&article.body, EXCERPT_CHARS)
    )
}

/// Build the composition prompt.
///
/// `greeting` is the time-of-day word used in the opening line
/// (see [`greeting_for_hour`]).
#[must_use]
pub fn build_prompt(brief: &CompositionBrief<'_>, anchor_name: &str, greeting: &str) -> Prompt {
    let topics = brief.topics.join(", ");
    let language = language_name(brief.language);
    let target = brief.target_words;
    let minutes = minutes_label(target, 140);

    let system = format!(
        "You are {anchor_name}, a news anchor writing a script that will be read aloud by a \
         text-to-speech voice. Write in {language}. Your tone is {}. Output only the words to \
         be spoken: no headings, no bullet points, no markdown, no stage directions, no speaker \
         labels.",
        tone_guidance(brief.tone)
    );

    let sources = if brief.articles.is_empty() {
        "No recent articles are available. Give general context and commentary on each topic: \
         why it matters, the ongoing themes, and what listeners may want to watch. Do not invent \
         specific events, quotes, names, dates, or figures.\n"
            .to_string()
    } else {
        let excerpts: String = brief
            .articles
            .iter()
            .take(MAX_PROMPT_ARTICLES)
            .enumerate()
            .map(|(i, article)| format!("\n{}", article_block(i + 1, article)))
            .collect();
        format!(
            "Recent articles, most relevant first:\n{excerpts}\n\
             Lead with the most significant developments. Use concrete details from the articles \
             (names, numbers, places) and explain why they matter. Only state facts supported by \
             the articles.\n"
        )
    };

    let user = format!(
        "Write a spoken news briefing of exactly {target} words on: {topics}.\n\
         The word count matters more than anything else: the audio must fill a fixed time slot.\n\
         \n\
         {sources}\
         \n\
         Structure:\n\
         - Open with: \"Good {greeting}, I'm {anchor_name} with your {minutes}-minute briefing on \
         {topics}.\"\n\
         - Use natural spoken transitions between stories.\n\
         - Close with: \"{CLOSING_LINE}\"\n\
         \n\
         Total length: {target} words."
    );

    Prompt { system, user }
}

#[cfg(test)]
mod tests {
    use newscast_core::{Article, ArticleSet};

    use super::*;

    fn article(title: &str, body: &str) -> Article {
        Article {
            title: title.to_string(),
            body: body.to_string(),
            url: "https://example.com/a".to_string(),
            source: "example.com".to_string(),
            topic: "markets".to_string(),
            published_at: None,
            relevance_score: 0.5,
            recency_score: 0.5,
            quality_score: 0.5,
            combined_score: 0.5,
        }
    }

    fn brief<'a>(topics: &'a [String], articles: &'a ArticleSet) -> CompositionBrief<'a> {
        CompositionBrief {
            topics,
            articles,
            target_words: 420,
            tone: Tone::Analytical,
            language: "es-MX",
        }
    }

    #[test]
    fn greeting_boundaries() {
        assert_eq!(greeting_for_hour(4), "evening");
        assert_eq!(greeting_for_hour(5), "morning");
        assert_eq!(greeting_for_hour(11), "morning");
        assert_eq!(greeting_for_hour(12), "afternoon");
        assert_eq!(greeting_for_hour(16), "afternoon");
        assert_eq!(greeting_for_hour(17), "evening");
        assert_eq!(greeting_for_hour(23), "evening");
    }

    #[test]
    fn prompt_carries_target_language_and_tone() {
        let topics = vec!["markets".to_string()];
        let articles = ArticleSet::new(vec![article("Stocks rally", "Shares rose.")]);
        let prompt = build_prompt(&brief(&topics, &articles), "Noah", "morning");
        assert!(prompt.user.contains("exactly 420 words"));
        assert!(prompt.system.contains("Spanish"));
        assert!(prompt.system.contains("causes, context"));
        assert!(prompt.user.contains("Good morning, I'm Noah with your 3-minute briefing"));
        assert!(prompt.user.contains(CLOSING_LINE));
        assert!(prompt.user.contains("Title: Stocks rally"));
    }

    #[test]
    fn excerpts_are_truncated() {
        let topics = vec!["markets".to_string()];
        let long_body = "word ".repeat(400);
        let articles = ArticleSet::new(vec![article("Long read", &long_body)]);
        let prompt = build_prompt(&brief(&topics, &articles), "Noah", "evening");
        let excerpt = prompt
            .user
            .lines()
            .find(|l| l.starts_with("Excerpt: "))
            .unwrap();
        assert!(excerpt.chars().count() <= "Excerpt: ".len() + 603);
    }

    #[test]
    fn at_most_fifteen_articles_are_included() {
        let topics = vec!["markets".to_string()];
        let articles = ArticleSet::new(
            (0..20)
                .map(|i| article(&format!("Story {i}"), "body"))
                .collect(),
        );
        let prompt = build_prompt(&brief(&topics, &articles), "Noah", "evening");
        assert_eq!(prompt.user.matches("Title: ").count(), 15);
    }

    #[test]
    fn empty_articles_ask_for_commentary_without_invention() {
        let topics = vec!["markets".to_string(), "climate".to_string()];
        let articles = ArticleSet::empty();
        let prompt = build_prompt(&brief(&topics, &articles), "Noah", "afternoon");
        assert!(prompt.user.contains("No recent articles are available"));
        assert!(prompt.user.contains("Do not invent"));
        assert!(prompt.user.contains("markets, climate"));
        assert!(!prompt.user.contains("Title: "));
    }

    #[test]
    fn article_sections_are_laid_out_in_order() {
        let topics = vec!["markets".to_string()];
        let articles = ArticleSet::new(vec![article("Rates held", "Policy unchanged.")]);
        let prompt = build_prompt(&brief(&topics, &articles), "Noah", "morning");

        assert!(prompt.user.starts_with(
            "Write a spoken news briefing of exactly 420 words on: markets.\n"
        ));
        assert!(prompt.user.contains(
            "Recent articles, most relevant first:\n\nArticle 1 (markets):\nTitle: Rates held\n\
             Source: example.com\nExcerpt: Policy unchanged.\n\nLead with"
        ));
        assert!(prompt.user.contains(
            "\n\nStructure:\n- Open with: \"Good morning, I'm Noah with your 3-minute briefing \
             on markets.\"\n"
        ));
        assert!(prompt.user.ends_with(&format!(
            "- Close with: \"{CLOSING_LINE}\"\n\nTotal length: 420 words."
        )));
    }

    #[test]
    fn unknown_language_tag_passes_through() {
        assert_eq!(language_name("sw"), "sw");
        assert_eq!(language_name("pt-BR"), "Portuguese");
    }
}
