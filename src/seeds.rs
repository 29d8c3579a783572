//! Built-in reading passages so the service is usable without a config file.

use crate::domain::Passage;

pub fn seed_passages() -> Vec<Passage> {
  vec![
    Passage::from_paragraphs(
      "The Transformative Influence of Artificial Intelligence on the Global Labor Market",
      &[
        "The advent of artificial intelligence has ushered in an era of unprecedented technological advancement, profoundly reshaping the landscape of employment worldwide. While AI automates routine tasks, it also fosters the emergence of novel roles that demand human ingenuity and adaptability.".to_string(),
        "Historically, technological revolutions have mirrored similar patterns of upheaval and renewal. During the Industrial Revolution, mechanization supplanted artisanal labor in textile manufacturing, yet it eventually spurred the growth of factory-based economies.".to_string(),
        "Beyond manufacturing, the service sector faces equally transformative pressures. Customer service, once reliant on human agents, now increasingly incorporates chatbots that handle routine inquiries with remarkable speed.".to_string(),
      ],
    ),
    Passage::from_paragraphs(
      "Urban Beekeeping",
      &[
        "Rooftop hives have become a familiar sight in many European capitals.".to_string(),
        "Supporters argue that city bees benefit from a wider variety of flowering plants than their rural counterparts, which often forage across vast single-crop fields.".to_string(),
      ],
    ),
  ]
}
