use anyhow::{anyhow, Result};
use log::{info, warn};

use crate::domain::layout::{builtin_layout, resolve_layout};
use crate::domain::student_service::validate_new_student;
use crate::storage::{CardRepository, StudentRepository};
use shared::{CardPreviewResponse, CardTemplate, CreateCardRequest, SavedCardWithStudent, Student};

/// Service for generating, listing, and resolving saved cards.
#[derive(Clone)]
pub struct CardService {
    cards: CardRepository,
    students: StudentRepository,
}

impl CardService {
    pub fn new(cards: CardRepository, students: StudentRepository) -> Self {
        Self { cards, students }
    }

    /// Create a saved card. When the request embeds a student instead of
    /// referencing one, the student is matched by unique id or created
    /// first, and the card links to the stored record.
    pub async fn create_card(&self, request: CreateCardRequest) -> Result<SavedCardWithStudent> {
        let template = CardTemplate::from_selector(request.template)
            .ok_or_else(|| anyhow!("Unknown card template: {}", request.template))?;
        if template == CardTemplate::Custom && request.custom_layout.is_none() {
            return Err(anyhow!("A custom card needs a customLayout"));
        }
        if template != CardTemplate::Custom && request.custom_layout.is_some() {
            return Err(anyhow!("customLayout is only valid with the custom template"));
        }

        let student = self.resolve_student(&request).await?;
        let card = self
            .cards
            .create_card(student.id, request.template, request.custom_layout.as_ref())
            .await?;

        info!("Created card {} for student {}", card.unique_id, student.id);
        Ok(SavedCardWithStudent { card, student })
    }

    async fn resolve_student(&self, request: &CreateCardRequest) -> Result<Student> {
        if let Some(student_id) = request.student_id {
            return self
                .students
                .get_student_by_id(student_id)
                .await?
                .ok_or_else(|| anyhow!("Student not found: {}", student_id));
        }

        let embedded = request
            .student
            .clone()
            .ok_or_else(|| anyhow!("Card request needs a studentId or an embedded student"))?;

        // Reuse the stored record when the embedded student is already known.
        if let Some(unique_id) = &embedded.unique_id {
            if let Some(existing) = self.students.get_student_by_unique_id(unique_id).await? {
                return Ok(existing);
            }
        }

        validate_new_student(&embedded)?;
        self.students.create_student(&embedded).await
    }

    /// Look up a card (with its student populated) by unique id.
    pub async fn get_card(&self, unique_id: &str) -> Result<Option<SavedCardWithStudent>> {
        let Some(card) = self.cards.get_card_by_unique_id(unique_id).await? else {
            warn!("Card not found: {}", unique_id);
            return Ok(None);
        };
        let student = self.populate_student(card.student_id, &card.unique_id).await?;
        Ok(Some(SavedCardWithStudent { card, student }))
    }

    /// List all cards, newest first, each with its student populated.
    pub async fn list_cards(&self) -> Result<Vec<SavedCardWithStudent>> {
        let cards = self.cards.list_cards().await?;
        let mut populated = Vec::with_capacity(cards.len());
        for card in cards {
            let student = self.populate_student(card.student_id, &card.unique_id).await?;
            populated.push(SavedCardWithStudent { card, student });
        }
        Ok(populated)
    }

    /// Resolve a card into the renderable values for its layout: the
    /// built-in arrangement for templates 1 and 2, the stored custom
    /// layout otherwise.
    pub async fn preview_card(&self, unique_id: &str) -> Result<Option<CardPreviewResponse>> {
        let Some(SavedCardWithStudent { card, student }) = self.get_card(unique_id).await? else {
            return Ok(None);
        };

        let template = CardTemplate::from_selector(card.template)
            .ok_or_else(|| anyhow!("Card {} has an unknown template: {}", card.unique_id, card.template))?;
        let layout = match card.custom_layout {
            Some(layout) => layout,
            None => builtin_layout(template)
                .ok_or_else(|| anyhow!("Card {} has no layout to render", card.unique_id))?,
        };

        let fields = resolve_layout(&student, &layout, template);
        Ok(Some(CardPreviewResponse {
            fields,
            background_color: layout.background_color,
            text_color: layout.text_color,
            accent_color: layout.accent_color,
        }))
    }

    async fn populate_student(&self, student_id: i64, card_unique_id: &str) -> Result<Student> {
        self.students
            .get_student_by_id(student_id)
            .await?
            .ok_or_else(|| anyhow!("Card {} references missing student {}", card_unique_id, student_id))
    }
}
