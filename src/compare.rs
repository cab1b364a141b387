use crate::brokers::Broker;
use crate::fees::calculator::{compute_fee, FeeError};
use crate::fees::types::BrokerFeeResult;
use crate::trade::TradeInput;

/// Run the fee engine for every selected broker. An empty selection means
/// the whole registry; a selection naming an unknown id is an error rather
/// than a silent skip.
pub fn compare_brokers(
    brokers: &[Broker],
    trade: &TradeInput,
    exchange_rate: f64,
) -> Result<Vec<BrokerFeeResult>, FeeError> {
    trade.validate()?;

    let selected: Vec<&Broker> = if trade.selected_broker_ids.is_empty() {
        brokers.iter().collect()
    } else {
        trade
            .selected_broker_ids
            .iter()
            .map(|id| {
                brokers
                    .iter()
                    .find(|b| &b.id == id)
                    .ok_or_else(|| FeeError::UnknownBroker(id.clone()))
            })
            .collect::<Result<_, _>>()?
    };

    selected
        .into_iter()
        .map(|broker| compute_fee(broker, trade, exchange_rate))
        .collect()
}
