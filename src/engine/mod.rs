pub mod achievements;
pub mod answer;
pub mod choices;
pub mod countdown;
