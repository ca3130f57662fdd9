//! Prompt construction.

use std::fmt::Write;
use xreply_core::TweetContent;
use xreply_store::{Settings, Tone};

/// Word range for topic tweets.
pub const TOPIC_WORD_RANGE: (u32, u32) = (10, 30);

/// One-line voice instruction for a tone.
pub fn tone_instruction(tone: Tone) -> &'static str {
    match tone {
        Tone::Casual => {
            "Text like a friend would: contractions, an occasional lowercase start, one or two natural emojis, relaxed punctuation, no corporate phrasing."
        }
        Tone::Professional => {
            "Clear and concise business voice in active voice, no emojis or filler, respectful but still conversational."
        }
        Tone::Humorous => {
            "Light wordplay and upbeat energy, at most one emoji, clever and relatable without being forced or mean."
        }
        Tone::Formal => {
            "Correct grammar without contractions, measured vocabulary, neutral and sincere, no emojis."
        }
        Tone::ProPlus => {
            "Confident executive voice: strong verbs, focus on results, brief, no emojis or exclamation marks."
        }
        Tone::Academic => {
            "Precise and analytical with appropriate hedging, complex ideas said simply, objective, no emojis."
        }
        Tone::Troll => {
            "Witty sarcasm aimed at the idea rather than the person, an eye-roll emoji is fine, sharp but never cruel."
        }
        Tone::Bully => {
            "Playful trash talk with absurd comparisons and a clown emoji, teasing the logic, never real harassment or hate."
        }
        Tone::Roasting => {
            "Good-natured roast with folksy metaphors and a goat emoji, mocking the idea, never a personal attack."
        }
    }
}

/// Builds the prompt for a reply to `tweet`.
pub fn reply_prompt(tweet: &TweetContent, settings: &Settings) -> String {
    let (min_words, max_words) = settings.word_range();
    let emoji_rule = if settings.include_emoji {
        "5. Include 1-2 contextually relevant emojis, placed naturally"
    } else {
        "5. NO emojis"
    };

    let mut prompt = String::with_capacity(1536);
    prompt.push_str("You are a real Twitter user responding naturally to a tweet.\n\n");
    let _ = writeln!(prompt, "ORIGINAL TWEET:\n\"{}\"\n", tweet.text);
    let _ = writeln!(
        prompt,
        "CONTEXT:\n- Author: {}\n- Language: {}\n- Type: {}\n",
        tweet.author, tweet.language, tweet.tweet_type
    );
    let _ = writeln!(
        prompt,
        "REQUIREMENTS:\n\
         1. Reply in the same language as the tweet\n\
         2. Length: {min_words} to {max_words} words (vary within this range)\n\
         3. Match the tweet's emotional tone and formality\n\
         4. Write like a person: occasional lowercase starts, loose punctuation (... !! ??), common abbreviations (ur, ppl, thx, bc), contractions\n\
         {emoji_rule}\n"
    );
    prompt.push_str(
        "CRITICAL RULES:\n\
         - Sound like a regular human user, never like an AI\n\
         - Never mention being an AI\n\
         - Stay on the tweet's subject and match its energy\n\
         - Be conversational and authentic\n\n\
         Generate ONLY the reply text. No explanations, metadata, or quotation marks.\n\n",
    );
    let _ = write!(prompt, "TONE INSTRUCTION: {}", tone_instruction(settings.tone));
    prompt
}

/// Builds the prompt for a standalone tweet about `topic`.
pub fn topic_prompt(topic: &str, tone: Tone, (min_words, max_words): (u32, u32)) -> String {
    let emoji_rule = if tone == Tone::Casual {
        "Add 1-2 contextually relevant emojis naturally"
    } else {
        "No emojis"
    };

    let mut prompt = String::with_capacity(1024);
    prompt.push_str("You are a real human Twitter user writing an authentic tweet.\n\n");
    let _ = writeln!(
        prompt,
        "TOPIC: {}\nTONE: {tone}\nLENGTH: {min_words}-{max_words} words\n",
        topic.trim()
    );
    let _ = writeln!(
        prompt,
        "REQUIREMENTS:\n\
         1. Write in the same language as the topic\n\
         2. Natural, conversational language with contractions\n\
         3. {emoji_rule}\n\
         4. Loose punctuation and casual abbreviations where they fit\n\
         5. {}\n",
        tone_instruction(tone)
    );
    prompt.push_str(
        "CRITICAL RULES:\n\
         - Write as a regular human, not an AI\n\
         - NO hashtags unless the topic itself contains one\n\
         - NO explanations or metadata\n\
         - Output ONLY the tweet text, without quotes",
    );
    prompt
}
