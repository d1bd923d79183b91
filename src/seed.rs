//! Built-in content used when no manifest is available.

use crate::content::{Category, ContentItem, LinkKind};

pub fn projects() -> Vec<ContentItem> {
    vec![
        ContentItem::new(
            "p1",
            "Gilded Light",
            "https://images.unsplash.com/photo-1549880338-65ddcdfd017b?q=80&w=1400&auto=format&fit=crop",
        )
        .with_category(Category::Painting)
        .with_year(2025)
        .with_description("Oil on canvas exploring chiaroscuro and edge control.")
        .with_tags(["oil", "portrait", "chiaroscuro"])
        .with_link(LinkKind::View, "#"),
        ContentItem::new(
            "p2",
            "Clockwork City (Short)",
            "https://images.unsplash.com/photo-1517694712202-14dd9538aa97?q=80&w=1400&auto=format&fit=crop",
        )
        .with_category(Category::ThreeD)
        .with_year(2024)
        .with_preview("https://samplelib.com/lib/preview/mp4/sample-5s.mp4")
        .with_description("Procedural city with camera flythrough; kitbash + custom shaders.")
        .with_tags(["blender", "animation", "shaders"])
        .with_link(LinkKind::View, "#"),
        ContentItem::new(
            "p3",
            "Power & Rebellion",
            "https://images.unsplash.com/photo-1520975930396-c0f8e58f9f2f?q=80&w=1400&auto=format&fit=crop",
        )
        .with_category(Category::Game)
        .with_year(2025)
        .with_description("Unity strategy-action jam game with AI-driven NPC factions.")
        .with_tags(["unity", "ai", "game-jam"])
        .with_link(LinkKind::Play, "#")
        .with_link(LinkKind::Page, "#")
        .with_link(LinkKind::Repo, "#"),
        ContentItem::new(
            "p4",
            "Still Life in Ultramarine",
            "https://images.unsplash.com/photo-1526312426976-593c12a8b7a0?q=80&w=1400&auto=format&fit=crop",
        )
        .with_category(Category::Painting)
        .with_year(2023)
        .with_description("Color harmony study; saturated accents over muted palette.")
        .with_tags(["oil", "still-life"])
        .with_link(LinkKind::View, "#"),
        ContentItem::new(
            "p5",
            "Creature RnD",
            "https://images.unsplash.com/photo-1605649487212-47bdab064df3?q=80&w=1400&auto=format&fit=crop",
        )
        .with_category(Category::ThreeD)
        .with_year(2025)
        .with_description("ZBrush sculpt → retopo → substance paint → UE5 render.")
        .with_tags(["zbrush", "substance", "ue5"])
        .with_link(LinkKind::View, "#"),
        ContentItem::new(
            "p6",
            "Loopstrider",
            "https://images.unsplash.com/photo-1509228627152-72ae9ae6848d?q=80&w=1400&auto=format&fit=crop",
        )
        .with_category(Category::Game)
        .with_year(2024)
        .with_description("Fast-paced side scroller where past paths become hazards.")
        .with_tags(["unity", "platformer"])
        .with_link(LinkKind::Play, "#")
        .with_link(LinkKind::Page, "#"),
    ]
}

/// Painting-category projects reduced to the fields a manifest entry carries.
pub fn paintings_fallback() -> Vec<ContentItem> {
    projects()
        .into_iter()
        .filter(|p| p.category == Some(Category::Painting))
        .map(|p| {
            let mut painting = ContentItem::new(p.id, p.title, p.image_url).with_category(Category::Painting);
            painting.description = p.description;
            painting.year = p.year;
            painting
        })
        .collect()
}
