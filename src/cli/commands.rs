use crate::app::{AppContext, Result, WikwokError};
use crate::domain::Language;
use crate::fetcher::ArticleFetcher;

fn resolve_language(code: &str) -> Result<Language> {
    Language::find(code).ok_or_else(|| WikwokError::UnknownLanguage(code.to_string()))
}

pub async fn random(ctx: &AppContext, count: Option<usize>, lang: Option<&str>) -> Result<()> {
    let language = match lang {
        Some(code) => resolve_language(code)?,
        None => ctx.language.get(),
    };
    let count = count.unwrap_or(ctx.config.feed.batch_size).max(1);

    let articles = ctx.fetcher.fetch_random(count, &language).await?;

    if articles.is_empty() {
        println!("No articles passed the filter, try again");
        return Ok(());
    }

    for article in articles {
        let marker = if ctx.liked.is_liked(article.id) { "♥" } else { " " };
        println!("{} {} [{}]\n  {}", marker, article.title, article.id, article.url);
        if let Some(first) = article.extract.lines().next() {
            println!("  {}", first);
        }
    }

    Ok(())
}

pub fn list_liked(ctx: &AppContext) -> Result<()> {
    let liked = ctx.liked.snapshot();

    if liked.is_empty() {
        println!("No liked articles yet");
        return Ok(());
    }

    for article in &liked.articles {
        println!(
            "{} [{}] ({})\n  {}",
            article.title, article.id, article.language.code, article.url
        );
    }

    Ok(())
}

pub fn list_languages(ctx: &AppContext) -> Result<()> {
    let selected = ctx.language.get();

    for language in Language::catalog() {
        let marker = if language.code == selected.code { "*" } else { " " };
        let direction = if language.is_rtl { " (RTL)" } else { "" };
        println!("{} {:<4} {}{}", marker, language.code, language.name, direction);
    }

    Ok(())
}

pub async fn set_language(ctx: &AppContext, code: &str) -> Result<Language> {
    let language = resolve_language(code)?;
    ctx.language.set(language.clone()).await?;
    println!("Selected language: {}", language);
    Ok(language)
}

pub async fn unlike(ctx: &AppContext, id: i64) -> Result<()> {
    let article = ctx.liked.find(id).ok_or(WikwokError::ArticleNotFound(id))?;
    ctx.liked.toggle_like(&article).await?;
    println!("Removed from liked: {}", article.title);
    Ok(())
}
