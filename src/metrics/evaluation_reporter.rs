use crate::metrics::mae::Mae;
use crate::metrics::rmse::Rmse;
use crate::metrics::PredictionMetric;

/// Aggregates every prediction metric over one evaluation run.
pub struct EvaluationReporter {
    rmse: Rmse,
    mae: Mae,
}

impl Default for EvaluationReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationReporter {
    pub fn new() -> EvaluationReporter {
        EvaluationReporter {
            rmse: Rmse::new(),
            mae: Mae::new(),
        }
    }

    pub fn add(&mut self, predicted: f64, actual: f64) {
        self.rmse.add(predicted, actual);
        self.mae.add(predicted, actual);
    }

    /// The headline error number of this evaluation.
    pub fn rmse(&self) -> f64 {
        self.rmse.result()
    }

    pub fn result(&self) -> String {
        let rmse_score = format!("{:.4}", self.rmse.result());
        let mae_score = format!("{:.4}", self.mae.result());
        format!("{},{}", rmse_score, mae_score)
    }

    pub fn get_name(&self) -> String {
        let rmse_name = self.rmse.get_name();
        let mae_name = self.mae.get_name();
        format!("{},{}", rmse_name, mae_name)
    }
}

#[cfg(test)]
mod evaluation_reporter_test {
    use super::*;

    #[test]
    fn should_report_all_metrics() {
        let mut reporter = EvaluationReporter::new();
        reporter.add(3.0, 4.0);
        reporter.add(5.0, 3.0);
        assert_eq!("Rmse,Mae", reporter.get_name());
        assert_eq!("1.5811,1.5000", reporter.result());
    }
}
